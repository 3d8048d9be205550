/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, LyraError>;

#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum LyraError {
    #[error("Pipeline mismatch error: {0}\n{1}")]
    PipelineMismatchError(String, ErrorContext),

    #[error("Derived field pattern error: {0}\n{1}")]
    PatternDecodeError(String, ErrorContext),

    #[error("Unknown mark type error: {0}\n{1}")]
    UnknownMarkTypeError(String, ErrorContext),

    #[error("Vega-Lite compilation error: {0}\n{1}")]
    CompilationError(String, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),

    #[error("Specification error: {0}\n{1}")]
    SpecificationError(String, ErrorContext),

    #[error("Serde JSON Error: {0}\n{1}")]
    SerdeJsonError(serde_json::Error, ErrorContext),
}

impl LyraError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use LyraError::*;
        match self {
            PipelineMismatchError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::PipelineMismatchError(msg, context)
            }
            PatternDecodeError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::PatternDecodeError(msg, context)
            }
            UnknownMarkTypeError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::UnknownMarkTypeError(msg, context)
            }
            CompilationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::CompilationError(msg, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::InternalError(msg, context)
            }
            SpecificationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::SpecificationError(msg, context)
            }
            SerdeJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                LyraError::SerdeJsonError(err, context)
            }
        }
    }

    pub fn pipeline_mismatch<S: Into<String>>(message: S) -> Self {
        Self::PipelineMismatchError(message.into(), Default::default())
    }

    pub fn pattern_decode<S: Into<String>>(message: S) -> Self {
        Self::PatternDecodeError(message.into(), Default::default())
    }

    pub fn unknown_mark_type<S: Into<String>>(message: S) -> Self {
        Self::UnknownMarkTypeError(message.into(), Default::default())
    }

    pub fn compilation<S: Into<String>>(message: S) -> Self {
        Self::CompilationError(message.into(), Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }

    pub fn specification<S: Into<String>>(message: S) -> Self {
        Self::SpecificationError(message.into(), Default::default())
    }

    /// Duplicate error. Not a precise Clone because serde_json::Error isn't Clone,
    /// so it is converted to a specification error
    pub fn duplicate(&self) -> Self {
        use LyraError::*;
        match self {
            PipelineMismatchError(msg, context) => {
                LyraError::PipelineMismatchError(msg.clone(), context.clone())
            }
            PatternDecodeError(msg, context) => {
                LyraError::PatternDecodeError(msg.clone(), context.clone())
            }
            UnknownMarkTypeError(msg, context) => {
                LyraError::UnknownMarkTypeError(msg.clone(), context.clone())
            }
            CompilationError(msg, context) => {
                LyraError::CompilationError(msg.clone(), context.clone())
            }
            InternalError(msg, context) => LyraError::InternalError(msg.clone(), context.clone()),
            SpecificationError(msg, context) => {
                LyraError::SpecificationError(msg.clone(), context.clone())
            }
            SerdeJsonError(err, context) => {
                LyraError::SpecificationError(err.to_string(), context.clone())
            }
        }
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<LyraError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let lyra_error: LyraError = err.into();
                Err(lyra_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(LyraError::internal(context_fn().into())),
        }
    }
}

impl From<serde_json::Error> for LyraError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeJsonError(err, Default::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{LyraError, ResultWithContext};

    #[test]
    fn test_context_is_appended_in_order() {
        let err = LyraError::pipeline_mismatch("mark 1 is bound to dataset 3")
            .with_context(|| "binding field profit")
            .with_context(|| "drop on x");
        let msg = err.to_string();
        assert!(msg.starts_with("Pipeline mismatch error: mark 1 is bound to dataset 3"));
        assert!(msg.contains("Context[0]: binding field profit"));
        assert!(msg.contains("Context[1]: drop on x"));
    }

    #[test]
    fn test_missing_option_becomes_internal_error() {
        let missing: Option<u32> = None;
        let err = missing.with_context(|| "No mark with id 4").unwrap_err();
        assert!(matches!(err, LyraError::InternalError(ref msg, _) if msg == "No mark with id 4"));
    }

    #[test]
    fn test_duplicate_serde_error() {
        let err: LyraError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err.duplicate(), LyraError::SpecificationError(..)));
    }
}
