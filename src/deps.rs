//! Declarative external-dependency reporting.
//!
//! Each build mechanism declares the external tools and libraries it needs as
//! a fixed list, so an embedding application can check or install them before
//! attempting a build.

/// One external tool or library a build mechanism requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalDependency {
    /// Short name used in operator-facing messages.
    pub name: &'static str,
    /// Executable expected on PATH, if any.
    pub executable: Option<&'static str>,
    /// Library the mechanism links against or drives, if any.
    pub library: Option<&'static str>,
    /// Distribution package providing the dependency.
    pub package: Option<&'static str>,
}

/// Implemented by every build-mechanism collaborator.
pub trait DeclaredDependencies {
    /// The fixed set of external dependencies this mechanism requires.
    fn dependencies(&self) -> &'static [ExternalDependency];
}
