/// Marker standing for "no value". It constructs, assigns, and compares as a disengaged
/// [`Optional`](crate::Optional).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nullopt;

/// The [`Nullopt`] marker value.
pub const NULLOPT: Nullopt = Nullopt;
