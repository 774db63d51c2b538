//! Type aliases for commonly used complex types.
//!
//! Complex types like `Rc<RefCell<T>>` or `Box<dyn FnMut(&T)>` are hard to
//! read at a glance; the aliases below give them names that convey intent.

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// All GridKit engines are single-threaded; this is how an observer closure
/// and its owner share a collaborator such as a key-value store.
///
/// # Example
/// ```rust
/// use gridkit_core::types::{shared, Shared};
///
/// let counter: Shared<u32> = shared(0);
/// *counter.borrow_mut() += 1;
/// assert_eq!(*counter.borrow(), 1);
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// A state listener registered with an engine's observer list.
pub type Listener<S> = Box<dyn FnMut(&S)>;

/// Wraps a value in [`Shared`].
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
