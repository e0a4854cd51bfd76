//! # Traverser capability: how published data walks the trie.
//!
//! A [`Traverse`] implementation is supplied per publish. At every node the
//! walk visits, the bus calls [`Traverse::traverse`] with the datum and the
//! path of the current node, and receives the branches to descend into.
//! Each [`Branch`] names a child label and may carry a replacement
//! traverser that takes over for that subtree only; branches without one
//! keep the traverser already in effect.
//!
//! Adapters:
//! - [`TraverseFn`] wraps a closure, the workhorse for routing derived from
//!   the datum's fields.
//! - [`LinearTraverser`] walks a single hardcoded path, one label per
//!   level.
//! - [`flat`], [`with_traverser`], [`branches`] and [`stop`] build branch
//!   iterators inside a traverser body.
//!
//! Branch order determines visit order. A label with no matching node
//! prunes that branch of the walk; it is not an error.

use std::sync::Arc;

/// Shared handle to a traverser, used when a branch replaces the traverser
/// for its subtree.
pub type TraverserRef<T> = Arc<dyn Traverse<T>>;

/// The branches yielded by one [`Traverse::traverse`] call, visited in
/// order until exhausted.
pub type BranchIter<T> = Box<dyn Iterator<Item = Branch<T>>>;

/// Routing decision for published data.
///
/// Implementations must not be mutated by the bus and may be freshly
/// constructed per publish or shared across publishes.
pub trait Traverse<T>: Send + Sync {
    /// Returns the branches to descend into from the node at
    /// `current_path`. An empty iterator ends the walk at this level.
    fn traverse(&self, data: &T, current_path: &[String]) -> BranchIter<T>;
}

/// One step of a traversal: the child label to descend into, and optionally
/// a traverser that replaces the current one for that subtree.
pub struct Branch<T> {
    pub label: String,
    pub traverser: Option<TraverserRef<T>>,
}

impl<T> Branch<T> {
    /// A branch that keeps the traverser currently in effect.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            traverser: None,
        }
    }

    /// A branch routed by its own traverser from the child onward.
    pub fn with_traverser(label: impl Into<String>, traverser: TraverserRef<T>) -> Self {
        Self {
            label: label.into(),
            traverser: Some(traverser),
        }
    }
}

/// Branches for a list of labels, none of them replacing the traverser.
pub fn flat<T: 'static>(labels: impl IntoIterator<Item = impl Into<String>>) -> BranchIter<T> {
    let list: Vec<Branch<T>> = labels.into_iter().map(Branch::new).collect();
    Box::new(list.into_iter())
}

/// Branches for a list of labels, every one of them handing the subtree to
/// the same `traverser`.
pub fn with_traverser<T: 'static>(
    labels: impl IntoIterator<Item = impl Into<String>>,
    traverser: TraverserRef<T>,
) -> BranchIter<T> {
    let list: Vec<Branch<T>> = labels
        .into_iter()
        .map(|label| Branch::with_traverser(label, Arc::clone(&traverser)))
        .collect();
    Box::new(list.into_iter())
}

/// Branch iterator over an explicit list, for mixing plain and
/// traverser-carrying branches.
pub fn branches<T: 'static>(list: Vec<Branch<T>>) -> BranchIter<T> {
    Box::new(list.into_iter())
}

/// No branches: the walk stops at this level.
pub fn stop<T: 'static>() -> BranchIter<T> {
    Box::new(std::iter::empty())
}

/// Function-backed traverser.
///
/// Wraps a `Fn(&T, &[String]) -> BranchIter<T>` closure. Use
/// [`TraverseFn::arc`] when a [`TraverserRef`] is needed, for example as a
/// branch replacement.
pub struct TraverseFn<F> {
    func: F,
}

impl<F> TraverseFn<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }

    /// Creates the traverser and returns it as a shared handle.
    pub fn arc<T>(func: F) -> TraverserRef<T>
    where
        T: 'static,
        F: Fn(&T, &[String]) -> BranchIter<T> + Send + Sync + 'static,
    {
        Arc::new(Self::new(func))
    }
}

impl<T, F> Traverse<T> for TraverseFn<F>
where
    F: Fn(&T, &[String]) -> BranchIter<T> + Send + Sync,
{
    fn traverse(&self, data: &T, current_path: &[String]) -> BranchIter<T> {
        (self.func)(data, current_path)
    }
}

/// Traverser for data that follows exactly one path.
///
/// Yields the first label of the remaining path at every level, handing the
/// rest of the path to a fresh `LinearTraverser` for the subtree, so the
/// path is consumed one label per level regardless of where the traverser
/// was attached.
#[derive(Clone, Debug)]
pub struct LinearTraverser {
    path: Vec<String>,
}

impl LinearTraverser {
    pub fn new(path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: 'static> Traverse<T> for LinearTraverser {
    fn traverse(&self, _data: &T, _current_path: &[String]) -> BranchIter<T> {
        let Some((first, rest)) = self.path.split_first() else {
            return stop();
        };

        let remainder: TraverserRef<T> = Arc::new(LinearTraverser { path: rest.to_vec() });
        Box::new(std::iter::once(Branch::with_traverser(
            first.clone(),
            remainder,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_preserves_label_order() {
        let list: Vec<Branch<u8>> = flat(["x", "y"]).collect();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].label, "x");
        assert_eq!(list[1].label, "y");
        assert!(list[0].traverser.is_none());
    }

    #[test]
    fn linear_traverser_consumes_one_label_per_level() {
        let traverser = LinearTraverser::new(["a", "b"]);

        let mut level = Traverse::<u8>::traverse(&traverser, &0, &[]);
        let branch = level.next().expect("first level yields a branch");
        assert_eq!(branch.label, "a");
        assert!(level.next().is_none());

        let remainder = branch.traverser.expect("remaining path rides along");
        let mut next_level = remainder.traverse(&0, &["a".to_string()]);
        let branch = next_level.next().expect("second level yields a branch");
        assert_eq!(branch.label, "b");

        let tail = branch.traverser.expect("tail traverser");
        assert!(tail.traverse(&0, &[]).next().is_none());
    }

    #[test]
    fn traverse_fn_adapts_closures() {
        let traverser = TraverseFn::new(|data: &u8, _: &[String]| -> BranchIter<u8> {
            flat([data.to_string()])
        });

        let labels: Vec<String> = traverser.traverse(&7, &[]).map(|b| b.label).collect();
        assert_eq!(labels, ["7"]);
    }
}
