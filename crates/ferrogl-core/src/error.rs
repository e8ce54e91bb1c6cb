use std::fmt;

use crate::api::ShaderStage;

/// Errors raised by the resource and marshalling layer.
///
/// Every variant is terminal for the call that produced it. Nothing here is
/// retried internally; callers decide whether to rebuild or abort.
#[derive(Debug, Clone, PartialEq)]
pub enum GlError {
    /// The driver rejected a shader. `log` is the driver's info log, verbatim.
    ShaderCompilation { stage: ShaderStage, log: String },

    /// The driver rejected a program link. `log` is the driver's info log, verbatim.
    ProgramLink { log: String },

    /// The driver could not locate a uniform by name in the linked program.
    UniformNotFound { name: String },

    /// A value or descriptor has no wire mapping, or its data does not match it.
    UnsupportedType { type_name: String, reason: String },

    /// An object was used in a state where the operation is not allowed
    /// (zero handle, unlinked program, empty vertex layout, ...).
    InvalidState { object: &'static str, reason: String },

    /// Texture image dimensions or data length do not fit the texture target.
    TextureShape { reason: String },

    /// A texture source failed to produce pixel data.
    TextureSource { message: String },
}

impl GlError {
    pub(crate) fn invalid_state(object: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidState { object, reason: reason.into() }
    }

    pub(crate) fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType { type_name: type_name.into(), reason: reason.into() }
    }

    pub(crate) fn texture_shape(reason: impl Into<String>) -> Self {
        Self::TextureShape { reason: reason.into() }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompilation { stage, log } => {
                write!(f, "{} shader compilation failed. Log:\n{}", stage.name(), log)
            }
            Self::ProgramLink { log } => write!(f, "program linking failed. Log:\n{log}"),
            Self::UniformNotFound { name } => {
                write!(f, "uniform `{name}` could not be located in this program")
            }
            Self::UnsupportedType { type_name, reason } => {
                write!(f, "unsupported type `{type_name}`: {reason}")
            }
            Self::InvalidState { object, reason } => write!(f, "invalid {object} state: {reason}"),
            Self::TextureShape { reason } => write!(f, "texture image shape mismatch: {reason}"),
            Self::TextureSource { message } => write!(f, "texture source failed: {message}"),
        }
    }
}

impl std::error::Error for GlError {}

pub type Result<T> = std::result::Result<T, GlError>;
