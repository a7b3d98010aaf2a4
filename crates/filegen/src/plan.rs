// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Job files: a KDL document listing several files to generate
//!
//! ```kdl
//! file "output.bin" size=1
//! file "disk.img" size=(gib)100
//! file "zeros.bin" size=(mib)4 fill="zero"
//! ```
//!
//! Untyped sizes are in kibibytes.

use std::{fmt, fs, path::Path, sync::Arc};

use itertools::{Either, Itertools};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use log::debug;
use miette::NamedSource;

use crate::{
    Error, FileSize, FillMethod, InvalidType, MissingEntry, MissingProperty, ParseError, Request, StorageUnit,
    UnsupportedNode, UnsupportedValue,
};

/// The type of a KDL value
#[derive(Debug)]
pub enum KdlType {
    /// A boolean value
    Boolean,
    /// A string value
    String,
    /// A null value
    Null,
    /// An integer value
    Integer,
    /// A floating point value
    Float,
}

impl KdlType {
    // Determine the kdl value type
    pub fn for_value(value: &KdlValue) -> Result<Self, Error> {
        if value.is_bool() {
            Ok(Self::Boolean)
        } else if value.is_string() {
            Ok(Self::String)
        } else if value.is_null() {
            Ok(Self::Null)
        } else if value.is_integer() {
            Ok(Self::Integer)
        } else if value.is_float() {
            Ok(Self::Float)
        } else {
            Err(Error::UnknownType)
        }
    }
}

impl fmt::Display for KdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdlType::Boolean => f.write_str("boolean"),
            KdlType::String => f.write_str("string"),
            KdlType::Null => f.write_str("null"),
            KdlType::Integer => f.write_str("int"),
            KdlType::Float => f.write_str("float"),
        }
    }
}

/// A batch of files to generate
#[derive(Debug, Default)]
pub struct Plan {
    pub requests: Vec<Request>,
}

impl Plan {
    /// Load a job file, resolving relative paths against its directory
    pub fn from_path<P>(file: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let file = file.as_ref();
        let name = file.to_string_lossy();
        let txt = fs::read_to_string(file)?;
        let mut plan = Self::parse(name.to_string(), txt)?;

        if let Some(base) = file.parent() {
            for request in plan.requests.iter_mut().filter(|r| r.path.is_relative()) {
                request.path = base.join(&request.path);
            }
        }

        Ok(plan)
    }

    /// Parse a job file from a string
    pub fn parse(name: String, contents: String) -> Result<Self, Error> {
        let source = Arc::new(contents);
        let doc = KdlDocument::parse_v2(&source)?;

        // Collect all failures in the document
        let (requests, diagnostics): (Vec<_>, Vec<_>) =
            doc.nodes().iter().partition_map(|node| match parse_file_node(node) {
                Ok(request) => Either::Left(request),
                Err(e) => Either::Right(e),
            });

        if !diagnostics.is_empty() {
            return Err(ParseError {
                src: NamedSource::new(name, source).with_language("KDL"),
                diagnostics,
            }
            .into());
        }

        debug!("Parsed {} file requests from {}", requests.len(), name);
        Ok(Self { requests })
    }
}

fn parse_file_node(node: &KdlNode) -> Result<Request, Error> {
    let name = node.name().value();
    if name != "file" {
        return Err(UnsupportedNode {
            at: node.span(),
            name: name.to_owned(),
            advice: Some("only 'file' nodes are supported".to_owned()),
        }
        .into());
    }

    let path = get_argument_str(node, 0, "path")?;
    let size = get_size(node)?;
    let method = get_fill_method(node)?;

    Ok(Request::new(path, size).with_method(method))
}

// Get a string argument from a node
fn get_argument_str(node: &KdlNode, index: usize, id: &str) -> Result<String, Error> {
    let entry = node.entry(index).ok_or_else(|| MissingEntry {
        at: node.span(),
        id: id.to_owned(),
        advice: Some(format!("add the {id} as a quoted string after '{}'", node.name().value())),
    })?;
    expect_string(entry)
}

fn expect_string(entry: &KdlEntry) -> Result<String, Error> {
    let value = entry.value();
    let found_type = KdlType::for_value(value)?;
    let value = value.as_string().ok_or(InvalidType {
        at: entry.span(),
        expected_type: KdlType::String,
        found_type,
        advice: Some("try using a quoted string".to_owned()),
    })?;
    Ok(value.to_owned())
}

// Parse the `size` property, honouring a unit type annotation
fn get_size(node: &KdlNode) -> Result<FileSize, Error> {
    let entry = node.entry("size").ok_or(MissingProperty {
        at: node.span(),
        id: "size",
        advice: Some("e.g. size=1 or size=(mib)10".to_owned()),
    })?;

    let found_type = KdlType::for_value(entry.value())?;
    let value = entry.value().as_integer().ok_or(InvalidType {
        at: entry.span(),
        expected_type: KdlType::Integer,
        found_type,
        advice: None,
    })?;

    let unit = match entry.ty() {
        Some(ty) => ty.value().to_lowercase().parse::<StorageUnit>().map_err(|_| UnsupportedValue {
            at: entry.span(),
            advice: Some("'b', 'kb', 'mb', 'gb', 'tb', 'kib', 'mib', 'gib', 'tib' are supported".into()),
        })?,
        None => StorageUnit::Kibibytes,
    };

    let out_of_range = || UnsupportedValue {
        at: entry.span(),
        advice: Some("size must be positive and fit in a file".into()),
    };
    let value = u64::try_from(value).map_err(|_| out_of_range())?;
    let size = FileSize::from_unit(value, unit).map_err(|_| out_of_range())?;

    Ok(size)
}

fn get_fill_method(node: &KdlNode) -> Result<FillMethod, Error> {
    let Some(entry) = node.entry("fill") else {
        return Ok(FillMethod::default());
    };

    match expect_string(entry)?.as_str() {
        "sparse" => Ok(FillMethod::Sparse),
        "zero" => Ok(FillMethod::Zeroed),
        _ => Err(UnsupportedValue {
            at: entry.span(),
            advice: Some("'sparse' and 'zero' are supported".into()),
        }
        .into()),
    }
}
