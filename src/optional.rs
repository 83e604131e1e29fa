use core::{
    convert::Infallible,
    fmt::{Debug, Display},
    mem::{self, MaybeUninit},
    ops::{Deref, DerefMut},
};

use scopeguard::ScopeGuard;

use crate::{trace, Nullopt};

pub use self::cmp::DISENGAGED_HASH;

/// Private module that defines comparison and hashing for optionals.
mod cmp;

/// Error returned by checked access into a disengaged [`Optional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadAccess;

#[cfg(feature = "std")]
impl std::error::Error for BadAccess {}

impl Display for BadAccess {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("bad optional access")
    }
}

/// A slot that either holds a live value of type `T` (engaged) or holds nothing (disengaged).
///
/// The value is stored inline in storage sized and aligned for `T`; no `T` is created while the
/// slot is disengaged. The engagement flag is only set once a value has been fully written, so a
/// constructor that fails (by returning an error or by panicking) never leaves the slot engaged.
///
/// ## Example
/// ```
/// # use optional::{Optional, BadAccess};
/// let mut slot = Optional::<i32>::new();
/// assert!(!slot.has_value());
/// assert_eq!(Err(BadAccess), slot.value());
/// assert_eq!(0, slot.value_or(0));
///
/// slot.assign(42);
/// assert_eq!(42, *slot);
/// assert_eq!(42, slot.value_or(0));
/// ```
pub struct Optional<T> {
    value: MaybeUninit<T>,
    engaged: bool,
}

impl<T> Optional<T> {
    /// Construct a disengaged `Optional`.
    pub const fn new() -> Self {
        Self {
            value: MaybeUninit::uninit(),
            engaged: false,
        }
    }

    /// Construct a disengaged `Optional` from the "no value" marker.
    pub const fn from_nullopt(_: Nullopt) -> Self {
        Self::new()
    }

    /// Construct an engaged `Optional` holding the given value.
    pub const fn some(value: T) -> Self {
        Self {
            value: MaybeUninit::new(value),
            engaged: true,
        }
    }

    /// Construct an engaged `Optional` from a value convertible into `T`.
    pub fn from_value<U: Into<T>>(value: U) -> Self {
        Self::some(value.into())
    }

    /// Construct an engaged `Optional` whose value is produced by `f`. If `f` panics, no
    /// `Optional` is created.
    pub fn in_place<F>(f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        Self::some(f())
    }

    /// Construct an engaged `Optional` from a fallible constructor, forwarding its error unchanged.
    pub fn try_in_place<E, F>(f: F) -> Result<Self, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        f().map(Self::some)
    }

    /// Construct an `Optional<T>` from an `Optional<U>`, converting the held value if there is one.
    ///
    /// ## Example
    /// ```
    /// # use optional::Optional;
    /// let narrow = Optional::some(7_i32);
    /// let wide = Optional::<i64>::from_optional(narrow);
    /// assert_eq!(Ok(&7), wide.value());
    ///
    /// let empty = Optional::<i64>::from_optional(Optional::<i32>::new());
    /// assert!(!empty.has_value());
    /// ```
    pub fn from_optional<U: Into<T>>(other: Optional<U>) -> Self {
        match other.into_option() {
            Some(value) => Self::some(value.into()),
            None => Self::new(),
        }
    }

    /// Construct an `Optional<T>` from a borrowed `Optional<U>`, cloning and converting the held
    /// value if there is one. The source is left untouched.
    pub fn from_optional_ref<U>(other: &Optional<U>) -> Self
    where
        U: Clone + Into<T>,
    {
        match other.as_ref() {
            Some(value) => Self::some(value.clone().into()),
            None => Self::new(),
        }
    }

    /// Whether this `Optional` currently holds a value.
    pub const fn has_value(&self) -> bool {
        self.engaged
    }

    /// Borrow the held value, if any.
    pub fn as_ref(&self) -> Option<&T> {
        if self.engaged {
            // SAFETY: The slot is engaged, so it holds a live T.
            Some(unsafe { self.value.assume_init_ref() })
        } else {
            None
        }
    }

    /// Mutably borrow the held value, if any.
    pub fn as_mut(&mut self) -> Option<&mut T> {
        if self.engaged {
            // SAFETY: The slot is engaged, so it holds a live T.
            Some(unsafe { self.value.assume_init_mut() })
        } else {
            None
        }
    }

    /// Get a shared reference to the held value without checking whether there is one.
    ///
    /// ## Safety
    /// The caller must ensure that `self` is engaged. This is checked with a debug assertion only.
    pub unsafe fn get_unchecked(&self) -> &T {
        debug_assert!(self.engaged, "get_unchecked on a disengaged Optional");
        // SAFETY: The caller has ensured that the slot is engaged.
        unsafe { self.value.assume_init_ref() }
    }

    /// Get a mutable reference to the held value without checking whether there is one.
    ///
    /// ## Safety
    /// The caller must ensure that `self` is engaged. This is checked with a debug assertion only.
    pub unsafe fn get_unchecked_mut(&mut self) -> &mut T {
        debug_assert!(self.engaged, "get_unchecked_mut on a disengaged Optional");
        // SAFETY: The caller has ensured that the slot is engaged.
        unsafe { self.value.assume_init_mut() }
    }

    /// Checked access to the held value. Returns [`BadAccess`] if there is no value.
    pub fn value(&self) -> Result<&T, BadAccess> {
        self.as_ref().ok_or(BadAccess)
    }

    /// Checked mutable access to the held value. Returns [`BadAccess`] if there is no value.
    pub fn value_mut(&mut self) -> Result<&mut T, BadAccess> {
        self.as_mut().ok_or(BadAccess)
    }

    /// Consume this `Optional` and return the held value, or [`BadAccess`] if there is none.
    pub fn into_value(self) -> Result<T, BadAccess> {
        self.into_option().ok_or(BadAccess)
    }

    /// Return a copy of the held value, or `default` converted into `T` if there is none.
    pub fn value_or<U: Into<T>>(&self, default: U) -> T
    where
        T: Clone,
    {
        match self.as_ref() {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Return a copy of the held value, or the result of `f` if there is none.
    pub fn value_or_else<F>(&self, f: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        match self.as_ref() {
            Some(value) => value.clone(),
            None => f(),
        }
    }

    /// Consume this `Optional` and return the held value, or `default` converted into `T`.
    pub fn into_value_or<U: Into<T>>(self, default: U) -> T {
        match self.into_option() {
            Some(value) => value,
            None => default.into(),
        }
    }

    /// Consume this `Optional` and return its contents as an [`Option`].
    pub fn into_option(mut self) -> Option<T> {
        self.take_value()
    }

    /// Move the contents out into a new `Optional`, leaving `self` disengaged.
    ///
    /// ## Example
    /// ```
    /// # use optional::Optional;
    /// let mut source = Optional::some(String::from("moved"));
    /// let dest = source.take();
    /// assert!(!source.has_value());
    /// assert_eq!("moved", *dest);
    /// ```
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Engage `self` with the given value, and return the former contents.
    pub fn replace(&mut self, value: T) -> Self {
        mem::replace(self, Self::some(value))
    }

    /// Assign a value. If `self` is engaged the held value is assigned over; otherwise the value is
    /// constructed into the empty slot.
    pub fn assign<U: Into<T>>(&mut self, value: U) -> &mut T {
        let value = value.into();
        if self.engaged {
            // SAFETY: The slot is engaged, so it holds a live T.
            let slot = unsafe { self.value.assume_init_mut() };
            *slot = value;
            slot
        } else {
            self.construct(value)
        }
    }

    /// Assign the "no value" marker. Equivalent to [`Optional::reset`].
    pub fn assign_nullopt(&mut self, _: Nullopt) {
        self.reset();
    }

    /// Assign from a borrowed `Optional<U>`. An engaged source is cloned, converted, and assigned as
    /// by [`Optional::assign`]; a disengaged source resets `self`.
    ///
    /// The clone is moved over the held value, so the held value's resources are not reused. To
    /// copy from an `Optional<T>` while reusing them, use [`Clone::clone_from`].
    pub fn assign_from<U>(&mut self, other: &Optional<U>)
    where
        U: Clone + Into<T>,
    {
        match other.as_ref() {
            Some(value) => {
                self.assign(value.clone());
            }
            None => self.reset(),
        }
    }

    /// Assign from an owned `Optional<U>`, following the same rules as [`Optional::assign_from`].
    pub fn assign_from_owned<U: Into<T>>(&mut self, other: Optional<U>) {
        match other.into_option() {
            Some(value) => {
                self.assign(value);
            }
            None => self.reset(),
        }
    }

    /// Drop the held value first, then construct a new one from `value`.
    ///
    /// ## Example
    /// ```
    /// # use optional::Optional;
    /// let mut greeting = Optional::<String>::new();
    /// greeting.emplace("hello");
    /// assert_eq!("hello", *greeting);
    /// greeting.emplace("world");
    /// assert_eq!("world", *greeting);
    /// ```
    pub fn emplace<U: Into<T>>(&mut self, value: U) -> &mut T {
        self.emplace_with(|| value.into())
    }

    /// Drop the held value first, then construct a new one with `f`.
    ///
    /// **Caution:** the former value is gone before `f` runs. If `f` panics, `self` is left
    /// disengaged.
    pub fn emplace_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_with(|| Ok::<T, Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Drop the held value first, then construct a new one with the fallible constructor `f`.
    ///
    /// **Caution:** the former value is gone before `f` runs. If `f` returns an error (or panics),
    /// `self` is left disengaged and the error is returned unchanged.
    ///
    /// ## Example
    /// ```
    /// # use optional::Optional;
    /// let mut port = Optional::some(8080_u16);
    /// let result = port.try_emplace_with(|| "not a port".parse::<u16>());
    /// assert!(result.is_err());
    /// assert!(!port.has_value());
    /// ```
    pub fn try_emplace_with<E, F>(&mut self, f: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.reset();
        let failed = scopeguard::guard((), |()| trace::construction_failed::<T>());
        let value = f()?;
        ScopeGuard::into_inner(failed);
        Ok(self.construct(value))
    }

    /// Drop the held value, if any, leaving `self` disengaged.
    pub fn reset(&mut self) {
        if !self.engaged {
            return;
        }
        trace::value_reset::<T>();
        let _disengage = scopeguard::guard(&mut self.engaged, |engaged| *engaged = false);
        // SAFETY: The slot is engaged. The guard clears the flag once the value is dropped, even if
        // its destructor unwinds, so the value is never dropped twice.
        unsafe { self.value.assume_init_drop() };
    }

    /// Exchange the contents of two optionals.
    ///
    /// If both are engaged the values are swapped in place. If exactly one is engaged its value is
    /// moved into the other, and the engagement flags trade places.
    pub fn swap(&mut self, other: &mut Self) {
        match (self.engaged, other.engaged) {
            (true, true) => {
                // SAFETY: Both slots are engaged.
                unsafe { mem::swap(self.value.assume_init_mut(), other.value.assume_init_mut()) }
            }
            (true, false) => other.move_from(self),
            (false, true) => self.move_from(other),
            (false, false) => {}
        }
    }

    /// Write `value` into the slot and mark it engaged.
    fn construct(&mut self, value: T) -> &mut T {
        debug_assert!(!self.engaged);
        let slot = self.value.write(value);
        self.engaged = true;
        slot
    }

    /// Move the value out of `source` into this disengaged slot.
    fn move_from(&mut self, source: &mut Self) {
        if let Some(value) = source.take_value() {
            self.construct(value);
        }
    }

    fn take_value(&mut self) -> Option<T> {
        if mem::replace(&mut self.engaged, false) {
            // SAFETY: The slot was engaged. Clearing the flag hands ownership of the value to us.
            Some(unsafe { self.value.assume_init_read() })
        } else {
            None
        }
    }
}

/// Exchange the contents of two optionals. See [`Optional::swap`].
pub fn swap<T>(a: &mut Optional<T>, b: &mut Optional<T>) {
    a.swap(b);
}

/// Construct an engaged [`Optional`] holding `value`.
pub fn make_optional<T>(value: T) -> Optional<T> {
    Optional::some(value)
}

/// Construct an engaged [`Optional`] whose value is produced by `f`.
pub fn make_optional_with<T, F>(f: F) -> Optional<T>
where
    F: FnOnce() -> T,
{
    Optional::in_place(f)
}

// trait implementations

impl<T> Drop for Optional<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() && self.engaged {
            // SAFETY: The slot is engaged and is never touched again.
            unsafe { self.value.assume_init_drop() }
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Optional<T> {
    fn clone(&self) -> Self {
        match self.as_ref() {
            Some(value) => Self::some(value.clone()),
            None => Self::new(),
        }
    }

    // assigns over an engaged value so that it can reuse its resources
    fn clone_from(&mut self, source: &Self) {
        let Some(src) = source.as_ref() else {
            self.reset();
            return;
        };
        match self.as_mut() {
            Some(dst) => dst.clone_from(src),
            None => {
                self.construct(src.clone());
            }
        }
    }
}

impl<T> Deref for Optional<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.as_ref().expect("dereferenced a disengaged Optional")
    }
}

impl<T> DerefMut for Optional<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut().expect("dereferenced a disengaged Optional")
    }
}

impl<T: Debug> Debug for Optional<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Optional").field(&self.as_ref()).finish()
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::some(value),
            None => Self::new(),
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T> From<&Optional<T>> for bool {
    fn from(value: &Optional<T>) -> Self {
        value.has_value()
    }
}
