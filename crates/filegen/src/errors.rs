// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{io, sync::Arc};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{plan::KdlType, StorageUnit};

/// Error type for the filegen crate
#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Kdl(#[from] kdl::KdlError),

    #[error("unknown type")]
    UnknownType,

    #[error("unknown variant")]
    UnknownVariant,

    #[error("size must be positive")]
    ZeroSize,

    #[error("{value} {unit} does not fit in a file")]
    SizeOverflow { value: u64, unit: StorageUnit },

    #[diagnostic(transparent)]
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[diagnostic(transparent)]
    #[error(transparent)]
    InvalidType(#[from] InvalidType),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnsupportedNode(#[from] UnsupportedNode),

    #[diagnostic(transparent)]
    #[error(transparent)]
    MissingEntry(#[from] MissingEntry),

    #[diagnostic(transparent)]
    #[error(transparent)]
    MissingProperty(#[from] MissingProperty),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnsupportedValue(#[from] UnsupportedValue),
}

/// Merged error for parsing failures
/// Returns a list of diagnostics for the user
#[derive(Debug, Diagnostic, Error)]
#[error("failed to parse job file")]
#[diagnostic(severity(error))]
pub struct ParseError {
    #[source_code]
    pub src: NamedSource<Arc<String>>,
    #[related]
    pub diagnostics: Vec<Error>,
}

/// Error for invalid types
#[derive(Debug, Diagnostic, Error)]
#[error("invalid type, expected {expected_type}")]
#[diagnostic(severity(error))]
pub struct InvalidType {
    #[label("found {found_type}")]
    pub at: SourceSpan,

    /// The expected type
    pub expected_type: KdlType,

    /// The type actually present
    pub found_type: KdlType,

    #[help]
    pub advice: Option<String>,
}

/// Error for missing mandatory properties
#[derive(Debug, Diagnostic, Error)]
#[error("missing property: {id}")]
#[diagnostic(severity(error))]
pub struct MissingProperty {
    #[label]
    pub at: SourceSpan,

    pub id: &'static str,

    #[help]
    pub advice: Option<String>,
}

/// Error for missing positional entries
#[derive(Debug, Diagnostic, Error)]
#[error("missing entry: {id}")]
#[diagnostic(severity(error))]
pub struct MissingEntry {
    #[label]
    pub at: SourceSpan,

    pub id: String,

    #[help]
    pub advice: Option<String>,
}

/// Error for unsupported node types
#[derive(Debug, Diagnostic, Error)]
#[error("unsupported node: {name}")]
#[diagnostic(severity(error))]
pub struct UnsupportedNode {
    #[label]
    pub at: SourceSpan,

    pub name: String,

    #[help]
    pub advice: Option<String>,
}

/// Error for unsupported values
#[derive(Debug, Diagnostic, Error)]
#[error("unsupported value")]
#[diagnostic(severity(error))]
pub struct UnsupportedValue {
    #[label]
    pub at: SourceSpan,

    #[help]
    pub advice: Option<String>,
}

/// Rejected size input; the message is shown before asking again
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSize {
    #[error("Invalid input. Please enter an integer.")]
    NotAnInteger,

    #[error("Size must be a positive number. Try again.")]
    NotPositive,

    #[error("Size is too large. Try again.")]
    TooLarge,
}

/// Failure to complete an interactive prompt
#[derive(Debug, Error)]
pub enum PromptError {
    #[error(transparent)]
    IO(#[from] io::Error),

    #[error("input closed before a value was entered")]
    Closed,
}
