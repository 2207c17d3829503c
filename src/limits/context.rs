use crate::limits::config::GruntzConfig;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::limits::trace::{TraceSink, TreeTrace};
use crate::symbolic::symbolic_engine::{Assumptions, Symbol};

/// State threaded through one limit computation.
///
/// Holds the settings, the recursion depth of the limitinf/mrv_leadterm pair, the
/// counter for fresh dummy symbols and the optional trace sink. A context is created per
/// top-level call and dropped with it.
pub struct LimitContext {
    pub config: GruntzConfig,
    depth: usize,
    next_id: u64,
    trace: Option<Box<dyn TraceSink>>,
}

impl LimitContext {
    pub fn new(config: GruntzConfig) -> Self {
        let trace: Option<Box<dyn TraceSink>> = if config.trace {
            Some(Box::new(TreeTrace::new()))
        } else {
            None
        };
        LimitContext {
            config,
            depth: 0,
            next_id: 1,
            trace,
        }
    }

    /// replaces the trace sink
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// a dummy symbol distinct from every symbol of the input and from earlier dummies
    pub fn fresh_symbol(&mut self, name: &str, assumptions: Assumptions) -> Symbol {
        let id = self.next_id;
        self.next_id += 1;
        Symbol::dummy(name, id, assumptions)
    }

    /// Runs `body` as a traced call named `name`.
    ///
    /// `args` and `render` are only evaluated when a sink is installed. The frame is closed
    /// on success and on error alike.
    pub(crate) fn traced<T, A, R, F>(
        &mut self,
        name: &str,
        args: A,
        render: R,
        body: F,
    ) -> LimitResult<T>
    where
        A: FnOnce() -> String,
        R: FnOnce(&T) -> String,
        F: FnOnce(&mut Self) -> LimitResult<T>,
    {
        if let Some(sink) = self.trace.as_mut() {
            sink.enter(&format!("{}({})", name, args()));
        }
        let result = body(self);
        if let Some(sink) = self.trace.as_mut() {
            match &result {
                Ok(value) => sink.leave(&render(value)),
                Err(err) => sink.leave(&format!("error: {}", err)),
            }
        }
        result
    }

    /// Like `traced`, counting the call against `max_depth`.
    pub(crate) fn guarded<T, A, R, F>(
        &mut self,
        name: &str,
        args: A,
        render: R,
        body: F,
    ) -> LimitResult<T>
    where
        A: FnOnce() -> String,
        R: FnOnce(&T) -> String,
        F: FnOnce(&mut Self) -> LimitResult<T>,
    {
        if self.depth >= self.config.max_depth {
            return Err(LimitError::LimitComputationTooComplex(self.config.max_depth));
        }
        self.depth += 1;
        let result = self.traced(name, args, render, body);
        self.depth -= 1;
        result
    }
}

impl Default for LimitContext {
    fn default() -> Self {
        LimitContext::new(GruntzConfig::default())
    }
}
