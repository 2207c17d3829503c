//! Execution tree of a limit computation.
//!
//! Every traced call reports `enter` with a rendering of its arguments and `leave` with its
//! result. [`TreeTrace`] nests the calls into a tree like
//! ```text
//! limitinf(exp(x)/x, x) = oo
//! +-mrv_leadterm(exp(_p)/_p, _p) = (1, -1)
//!   +-mrv(exp(_p)/_p, _p) = {exp(_p)}
//! ```
//! and hands each finished top-level tree to the log and to an optional callback.
use log::debug;

pub trait TraceSink {
    fn enter(&mut self, call: &str);
    fn leave(&mut self, result: &str);
}

struct Frame {
    call: String,
    children: Vec<String>,
}

/// Collects calls into indented trees.
#[derive(Default)]
pub struct TreeTrace {
    stack: Vec<Frame>,
    finished: Vec<String>,
    callback: Option<Box<dyn FnMut(&str)>>,
}

impl TreeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// `callback` receives every completed top-level tree
    pub fn with_callback(callback: Box<dyn FnMut(&str)>) -> Self {
        TreeTrace {
            stack: Vec::new(),
            finished: Vec::new(),
            callback: Some(callback),
        }
    }

    pub fn trees(&self) -> &[String] {
        &self.finished
    }
}

fn indent(subtree: &str, last: bool) -> String {
    let mut lines = subtree.split('\n').filter(|l| !l.is_empty());
    let mut out = String::new();
    if let Some(first) = lines.next() {
        out.push_str(&format!("+-{}\n", first));
    }
    let prefix = if last { "  " } else { "| " };
    for line in lines {
        out.push_str(prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn tree(subtrees: &[String]) -> String {
    let n = subtrees.len();
    subtrees
        .iter()
        .enumerate()
        .map(|(i, s)| indent(s, i + 1 == n))
        .collect()
}

impl TraceSink for TreeTrace {
    fn enter(&mut self, call: &str) {
        self.stack.push(Frame {
            call: call.to_string(),
            children: Vec::new(),
        });
    }

    fn leave(&mut self, result: &str) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let mut node = format!("{} = {}\n", frame.call, result);
        node.push_str(&tree(&frame.children));
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                debug!("\n{}", node);
                if let Some(callback) = self.callback.as_mut() {
                    callback(&node);
                }
                self.finished.push(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_single_call() {
        let mut trace = TreeTrace::new();
        trace.enter("limitinf(1, x)");
        trace.leave("1");
        assert_eq!(trace.trees(), &["limitinf(1, x) = 1\n".to_string()]);
    }

    #[test]
    fn test_nested_layout() {
        let mut trace = TreeTrace::new();
        trace.enter("a()");
        trace.enter("b()");
        trace.enter("c()");
        trace.leave("3");
        trace.leave("2");
        trace.enter("d()");
        trace.leave("4");
        trace.leave("1");
        let expected = "a() = 1\n+-b() = 2\n| +-c() = 3\n+-d() = 4\n";
        assert_eq!(trace.trees()[0], expected);
    }

    #[test]
    fn test_last_child_indent() {
        let mut trace = TreeTrace::new();
        trace.enter("a()");
        trace.enter("b()");
        trace.enter("c()");
        trace.leave("3");
        trace.leave("2");
        trace.leave("1");
        assert_eq!(trace.trees()[0], "a() = 1\n+-b() = 2\n  +-c() = 3\n");
    }

    #[test]
    fn test_callback_receives_top_level_trees() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut trace =
            TreeTrace::with_callback(Box::new(move |t: &str| sink.borrow_mut().push(t.to_string())));
        trace.enter("f()");
        trace.leave("0");
        trace.enter("g()");
        trace.leave("1");
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], "g() = 1\n");
        // unmatched leave is ignored
        trace.leave("x");
        assert_eq!(trace.trees().len(), 2);
    }
}
