/// Knobs for the places where the checker's rules admit a choice.
///
/// The default is the reference behavior; [`CheckerConfig::strict`] turns
/// every extra check on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckerConfig {
    /// Check the argument of a one-argument builtin (other than `print`)
    /// against its declared parameter.
    pub strict_builtin_arguments: bool,
    /// For two-argument builtins, require each argument to be assignable to
    /// its declared parameter. When off, each declared parameter must be
    /// assignable to the argument instead.
    pub conventional_builtin_direction: bool,
    /// Check constructor arguments against the `__init__` parameters.
    pub check_constructor_arguments: bool,
}

impl CheckerConfig {
    pub fn reference() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict_builtin_arguments: true,
            conventional_builtin_direction: true,
            check_constructor_arguments: true,
        }
    }
}
