use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// An `Rc` compared and hashed by the address of its allocation.
pub struct RcAddr<T: ?Sized> {
	ptr: Rc<T>,
}

impl<T: ?Sized> RcAddr<T> {
	pub fn new(ptr: Rc<T>) -> Self {
		RcAddr { ptr }
	}

	// Metadata is dropped: two trait objects over the same allocation
	// are the same address even if their vtables differ.
	pub fn addr(&self) -> *const () {
		Rc::as_ptr(&self.ptr).cast::<()>()
	}
}

impl<T: ?Sized> Clone for RcAddr<T> {
	fn clone(&self) -> Self {
		RcAddr {
			ptr: self.ptr.clone(),
		}
	}
}

impl<T: ?Sized> Deref for RcAddr<T> {
	type Target = Rc<T>;
	fn deref(&self) -> &Self::Target {
		&self.ptr
	}
}

impl<T: ?Sized> PartialEq for RcAddr<T> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<T: ?Sized> Eq for RcAddr<T> {}

impl<T: ?Sized> Hash for RcAddr<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state)
	}
}
