//! Doubly linked list that records entry order for [`OrderedMap`](crate::ordered::OrderedMap).
//!
//! The newest entry sits right after the head sentinel, the oldest right before
//! the tail sentinel. Nodes are heap allocated and handed out as raw pointers so
//! the owning map can index them by key and unlink or reorder them in O(1).
//!
//! The list carries no capacity of its own; bounding is the map's job.

use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ptr;

/// A node in the list. Sentinels leave `val` uninitialised.
pub(crate) struct Node<T> {
    val: MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn sentinel() -> Self {
        Node {
            val: MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// # Safety
    ///
    /// Must not be called on a sentinel.
    pub(crate) unsafe fn value(&self) -> &T {
        // SAFETY: caller guarantees this is a value node, so `val` is initialised.
        unsafe { self.val.assume_init_ref() }
    }

    /// # Safety
    ///
    /// Must not be called on a sentinel.
    pub(crate) unsafe fn value_mut(&mut self) -> &mut T {
        // SAFETY: caller guarantees this is a value node, so `val` is initialised.
        unsafe { self.val.assume_init_mut() }
    }
}

pub(crate) struct List<T> {
    len: usize,
    head: *mut Node<T>,
    tail: *mut Node<T>,
}

impl<T> List<T> {
    pub(crate) fn new() -> Self {
        let head = Box::into_raw(Box::new(Node::sentinel()));
        let tail = Box::into_raw(Box::new(Node::sentinel()));
        // SAFETY: both sentinels were just allocated and are valid.
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }
        List { len: 0, head, tail }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links `val` in as the newest element and returns its node.
    pub(crate) fn push_front(&mut self, val: T) -> *mut Node<T> {
        let node = Box::into_raw(Box::new(Node::new(val)));
        // SAFETY: `node` is freshly allocated and not linked anywhere.
        unsafe { self.attach_front(node) };
        self.len += 1;
        node
    }

    /// Unlinks the oldest element and returns its value.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so `tail.prev` is a value node.
        unsafe {
            let node = (*self.tail).prev;
            Some(self.unlink(node))
        }
    }

    /// The oldest element, if any.
    pub(crate) fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so `tail.prev` is a value node.
        unsafe { Some((*(*self.tail).prev).value()) }
    }

    /// Removes `node` from the list, frees it and returns its value.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    pub(crate) unsafe fn unlink(&mut self, node: *mut Node<T>) -> T {
        // SAFETY: caller guarantees `node` is linked into this list.
        unsafe {
            self.detach(node);
            self.len -= 1;
            let node = *Box::from_raw(node);
            node.val.assume_init()
        }
    }

    /// Makes `node` the newest element.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        // SAFETY: caller guarantees `node` is linked into this list.
        unsafe {
            if (*self.head).next == node {
                return;
            }
            self.detach(node);
            self.attach_front(node);
        }
    }

    /// Swaps the value held by `node`, returning the previous one.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    pub(crate) unsafe fn replace(&mut self, node: *mut Node<T>, val: T) -> T {
        // SAFETY: caller guarantees `node` is an initialised value node.
        unsafe { mem::replace((*node).value_mut(), val) }
    }

    /// Iterates from the oldest element to the newest.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        // SAFETY: sentinels are valid for the lifetime of the list.
        let first = unsafe { (*self.tail).prev };
        Iter {
            cursor: first,
            end: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    pub(crate) fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    /// # Safety
    ///
    /// `node` must be linked into this list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: a linked node always has valid neighbours.
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// # Safety
    ///
    /// `node` must be valid and not linked into any list.
    unsafe fn attach_front(&mut self, node: *mut Node<T>) {
        // SAFETY: head is valid for the lifetime of the list; caller owns `node`.
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: sentinels were allocated in `new` and are freed exactly once here.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T> core::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("List").field("len", &self.len).finish()
    }
}

/// Oldest-to-newest iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    cursor: *mut Node<T>,
    end: *mut Node<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == self.end {
            return None;
        }
        // SAFETY: every node between the sentinels is a live value node, and the
        // shared borrow of the list keeps it from being mutated while we iterate.
        unsafe {
            let node = &*self.cursor;
            self.cursor = node.prev;
            self.remaining -= 1;
            Some(node.value())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
