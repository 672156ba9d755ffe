//! Compiled path expressions.

use std::fmt;
use std::sync::Arc;

use crate::filter::Filter;

/// One component of a compiled expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// An attribute name, or a schema namespace in leading position.
    Path(String),
    /// A predicate selecting elements of a multi-valued attribute.
    Filter(Filter),
}

impl Step {
    /// Returns `true` for a path token.
    pub fn is_path(&self) -> bool {
        matches!(self, Step::Path(_))
    }

    /// The path token, if this step is one.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Step::Path(p) => Some(p),
            Step::Filter(_) => None,
        }
    }

    /// The filter, if this step is one.
    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            Step::Path(_) => None,
            Step::Filter(f) => Some(f),
        }
    }
}

/// An immutable, non-empty sequence of [`Step`]s.
///
/// Steps are shared, so [`Expression::next`] is cheap and never touches
/// the expression it was called on.
#[derive(Clone, Debug)]
pub struct Expression {
    steps: Arc<[Step]>,
    start: usize,
}

impl Expression {
    /// Build an expression from steps. Returns `None` when `steps` is empty.
    pub fn from_steps(steps: Vec<Step>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self {
            steps: steps.into(),
            start: 0,
        })
    }

    /// Single path-token expression.
    pub fn path(token: impl Into<String>) -> Self {
        Self {
            steps: Arc::from(vec![Step::Path(token.into())]),
            start: 0,
        }
    }

    /// Single filter expression.
    pub fn filter(filter: Filter) -> Self {
        Self {
            steps: Arc::from(vec![Step::Filter(filter)]),
            start: 0,
        }
    }

    /// The remaining steps, head first.
    pub fn steps(&self) -> &[Step] {
        &self.steps[self.start..]
    }

    /// The first remaining step.
    pub fn head(&self) -> &Step {
        &self.steps[self.start]
    }

    /// Number of remaining steps.
    pub fn len(&self) -> usize {
        self.steps.len() - self.start
    }

    /// Always `false`; an expression has at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if the head is a path token.
    pub fn is_path(&self) -> bool {
        self.head().is_path()
    }

    /// The head's path token, or `None` if the head is a filter.
    pub fn token(&self) -> Option<&str> {
        self.head().as_path()
    }

    /// The expression with its head consumed, or `None` at the last step.
    pub fn next(&self) -> Option<Expression> {
        if self.start + 1 >= self.steps.len() {
            return None;
        }
        Some(Self {
            steps: Arc::clone(&self.steps),
            start: self.start + 1,
        })
    }

    /// A new expression with `tail`'s steps after this one's.
    pub fn append(&self, tail: Option<&Expression>) -> Expression {
        match tail {
            None => self.clone(),
            Some(tail) => {
                let steps: Vec<Step> = self
                    .steps()
                    .iter()
                    .chain(tail.steps().iter())
                    .cloned()
                    .collect();
                Self {
                    steps: steps.into(),
                    start: 0,
                }
            }
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.steps() == other.steps()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps().iter().enumerate() {
            match step {
                Step::Path(p) if i == 0 => f.write_str(p)?,
                Step::Path(p) => write!(f, ".{p}")?,
                Step::Filter(filter) => write!(f, "[{filter}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AttrPath;

    fn sample() -> Expression {
        Expression::from_steps(vec![
            Step::Path("emails".into()),
            Step::Filter(Filter::Present(AttrPath::single("value"))),
            Step::Path("display".into()),
        ])
        .unwrap()
    }

    #[test]
    fn empty_steps_yield_none() {
        assert!(Expression::from_steps(Vec::new()).is_none());
    }

    #[test]
    fn next_does_not_mutate() {
        let expr = sample();
        let rest = expr.next().unwrap();

        assert_eq!(expr.len(), 3);
        assert_eq!(expr.token(), Some("emails"));
        assert_eq!(rest.len(), 2);
        assert!(!rest.is_path());
        assert_eq!(rest.token(), None);

        let last = rest.next().unwrap();
        assert_eq!(last.token(), Some("display"));
        assert!(last.next().is_none());
    }

    #[test]
    fn append_chains_steps() {
        let head = Expression::path("emails");
        let tail = Expression::filter(Filter::Present(AttrPath::single("value")));
        let joined = head.append(Some(&tail));
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.to_string(), "emails[value pr]");
        assert_eq!(head.append(None), head);
    }

    #[test]
    fn equality_ignores_sharing() {
        let expr = sample();
        let rest = expr.next().unwrap();
        let rebuilt = Expression::from_steps(expr.steps()[1..].to_vec()).unwrap();
        assert_eq!(rest, rebuilt);
    }

    #[test]
    fn display_joins_with_dots() {
        assert_eq!(sample().to_string(), "emails[value pr].display");
    }
}
