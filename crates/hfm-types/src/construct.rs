//! Fallible construction for validated payload types.
//!
//! Command payloads that carry invariants (a non-empty component name, a
//! positive slice count) implement [`TryNew`]. Smart constructors on an
//! algebra call `try_new` and surface the failure as a construction error
//! before any command exists, so an invalid command never reaches the
//! engine.
//!
//! | Pattern | Use When |
//! |---------|----------|
//! | `new()` | Construction always succeeds |
//! | [`TryNew`] | Construction validates its input |
//! | `TryFrom<T>` | Converting from another type |

/// Trait for fallible construction with validation.
///
/// Types implementing `TryNew` should not also expose a plain `new()`
/// performing the same validation; the `try_` prefix keeps fallibility
/// visible at the call site.
///
/// # Example
///
/// ```
/// use hfm_types::TryNew;
///
/// #[derive(Debug)]
/// struct Slices(u8);
///
/// #[derive(Debug, PartialEq)]
/// struct NoSlices;
///
/// impl TryNew for Slices {
///     type Error = NoSlices;
///     type Args = u8;
///
///     fn try_new(count: u8) -> Result<Self, Self::Error> {
///         if count == 0 {
///             return Err(NoSlices);
///         }
///         Ok(Slices(count))
///     }
/// }
///
/// assert!(Slices::try_new(8).is_ok());
/// assert_eq!(Slices::try_new(0).unwrap_err(), NoSlices);
/// ```
pub trait TryNew {
    /// The error returned when validation fails.
    type Error;

    /// Arguments required for construction (a tuple for several).
    type Args;

    /// Attempts to create a new instance.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if validation fails. Validation must be pure.
    fn try_new(args: Self::Args) -> Result<Self, Self::Error>
    where
        Self: Sized;
}
