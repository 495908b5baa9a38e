//! Matrix Market text format.
//!
//! Reads `coordinate` files (real, integer or pattern; general or symmetric)
//! into compressed sparse column storage, and `array` files (real or integer,
//! general) into column-major dense storage. Writes coordinate real general.

use crate::base::{Element, Matrix, SharedMatrix};
use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::sparse::{compress_sparse_triplets, convert_to_fragmented_sparse, CompressedSparseMatrix};
use anyhow::Context;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Upper bound on elements reserved from header counts before any data is read.
const MAX_RESERVED: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Coordinate,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    format: Format,
    field: Field,
    symmetry: Symmetry,
}

/// A matrix loaded from a Matrix Market file.
#[derive(Debug)]
pub enum LoadedMatrix {
    Sparse(CompressedSparseMatrix<f64>),
    Dense(DenseMatrix<f64>),
}

impl LoadedMatrix {
    pub fn into_shared(self) -> SharedMatrix<f64> {
        match self {
            LoadedMatrix::Sparse(m) => Arc::new(m),
            LoadedMatrix::Dense(m) => Arc::new(m),
        }
    }
}

fn parse_header(line: &str) -> Result<Header> {
    let tokens: Vec<String> = line.split_whitespace().map(|t| t.to_ascii_lowercase()).collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" || tokens[1] != "matrix" {
        return Err(MatrixError::parse(1, "expected '%%MatrixMarket matrix <format> <field> <symmetry>'"));
    }

    let format = match tokens[2].as_str() {
        "coordinate" => Format::Coordinate,
        "array" => Format::Array,
        other => return Err(MatrixError::parse(1, format!("unsupported format '{}'", other))),
    };
    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" if format == Format::Coordinate => Field::Pattern,
        other => return Err(MatrixError::parse(1, format!("unsupported field '{}'", other))),
    };
    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" if format == Format::Coordinate => Symmetry::Symmetric,
        other => return Err(MatrixError::parse(1, format!("unsupported symmetry '{}'", other))),
    };

    Ok(Header {
        format,
        field,
        symmetry,
    })
}

fn parse_count(token: &str, line: usize, what: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| MatrixError::parse(line, format!("invalid {} '{}'", what, token)))
}

fn parse_value(token: &str, field: Field, line: usize) -> Result<f64> {
    match field {
        Field::Integer => token
            .parse::<i64>()
            .map(|x| x as f64)
            .map_err(|_| MatrixError::parse(line, format!("invalid integer '{}'", token))),
        _ => token
            .parse::<f64>()
            .map_err(|_| MatrixError::parse(line, format!("invalid value '{}'", token))),
    }
}

/// A 1-based index converted to 0-based, checked against `extent`.
fn parse_index(token: &str, extent: usize, line: usize, what: &str) -> Result<usize> {
    let index = parse_count(token, line, what)?;
    if index == 0 {
        return Err(MatrixError::parse(line, format!("{} index must be positive", what)));
    }
    if index > extent {
        return Err(MatrixError::parse(line, format!("{} index out of range", what)));
    }
    Ok(index - 1)
}

/// Reject repeated coordinates in CSC storage sorted within each column.
fn check_duplicates(pointers: &[usize], rows: &[usize], size_line: usize) -> Result<()> {
    for (c, bounds) in pointers.windows(2).enumerate() {
        let column = &rows[bounds[0]..bounds[1]];
        if let Some(pair) = column.windows(2).find(|w| w[0] == w[1]) {
            return Err(MatrixError::parse(
                size_line,
                format!("duplicate entry for row {} and column {}", pair[0] + 1, c + 1),
            ));
        }
    }
    Ok(())
}

/// Read a Matrix Market file from any buffered reader.
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<LoadedMatrix> {
    let mut lines = reader.lines().enumerate().map(|(n, l)| (n + 1, l));

    let header = match lines.next() {
        Some((_, line)) => parse_header(&line?)?,
        None => return Err(MatrixError::parse(1, "empty input")),
    };

    // Skip comments and blank lines before the size line.
    let mut data = lines.filter_map(|(n, l)| match l {
        Ok(l) => {
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                None
            } else {
                Some(Ok((n, trimmed.to_string())))
            }
        }
        Err(e) => Some(Err(e)),
    });

    let (size_line, size) = match data.next() {
        Some(x) => x?,
        None => return Err(MatrixError::parse(2, "missing size line")),
    };
    let fields: Vec<&str> = size.split_whitespace().collect();
    let expected_fields = if header.format == Format::Coordinate { 3 } else { 2 };
    if fields.len() != expected_fields {
        return Err(MatrixError::parse(
            size_line,
            format!("size line should contain {} values", expected_fields),
        ));
    }
    let nrow = parse_count(fields[0], size_line, "row count")?;
    let ncol = parse_count(fields[1], size_line, "column count")?;

    match header.format {
        Format::Coordinate => {
            let nlines = parse_count(fields[2], size_line, "line count")?;
            let per_line = if header.field == Field::Pattern { 2 } else { 3 };
            // Header counts are untrusted, so only reserve a bounded amount up front.
            let capacity = nlines.min(MAX_RESERVED);
            let mut rows = Vec::with_capacity(capacity);
            let mut columns = Vec::with_capacity(capacity);
            let mut values = Vec::with_capacity(capacity);

            let mut observed = 0;
            for entry in data {
                let (n, line) = entry?;
                if observed == nlines {
                    return Err(MatrixError::parse(
                        n,
                        format!("more lines present than specified in the header ({})", nlines),
                    ));
                }
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != per_line {
                    return Err(MatrixError::parse(n, format!("line should contain {} values", per_line)));
                }
                let r = parse_index(tokens[0], nrow, n, "row")?;
                let c = parse_index(tokens[1], ncol, n, "column")?;
                let x = if header.field == Field::Pattern {
                    1.0
                } else {
                    parse_value(tokens[2], header.field, n)?
                };

                rows.push(r);
                columns.push(c);
                values.push(x);
                if header.symmetry == Symmetry::Symmetric && r != c {
                    rows.push(c);
                    columns.push(r);
                    values.push(x);
                }
                observed += 1;
            }
            if observed != nlines {
                return Err(MatrixError::parse(
                    size_line,
                    format!("expected {} data lines, found {}", nlines, observed),
                ));
            }

            let pointers = compress_sparse_triplets(nrow, ncol, &mut values, &mut rows, &mut columns, false)?;
            check_duplicates(&pointers, &rows, size_line)?;
            debug!("Read {}x{} coordinate matrix with {} entries", nrow, ncol, values.len());
            Ok(LoadedMatrix::Sparse(CompressedSparseMatrix::csc(nrow, ncol, values, rows, pointers)?))
        }

        Format::Array => {
            let expected = nrow
                .checked_mul(ncol)
                .ok_or_else(|| MatrixError::parse(size_line, format!("{} x {} values overflow", nrow, ncol)))?;
            let mut values = Vec::with_capacity(expected.min(MAX_RESERVED));
            for entry in data {
                let (n, line) = entry?;
                for token in line.split_whitespace() {
                    if values.len() == expected {
                        return Err(MatrixError::parse(
                            n,
                            format!("more values present than specified in the header ({})", expected),
                        ));
                    }
                    values.push(parse_value(token, header.field, n)?);
                }
            }
            if values.len() != expected {
                return Err(MatrixError::parse(
                    size_line,
                    format!("expected {} values, found {}", expected, values.len()),
                ));
            }

            debug!("Read {}x{} array matrix", nrow, ncol);
            Ok(LoadedMatrix::Dense(DenseMatrix::column_major(nrow, ncol, values)?))
        }
    }
}

/// Read a Matrix Market file from disk.
pub fn load_matrix_market(path: &Path) -> anyhow::Result<LoadedMatrix> {
    let file = File::open(path).with_context(|| format!("Failed to open Matrix Market file: {:?}", path))?;
    let loaded = read_matrix_market(BufReader::new(file))
        .with_context(|| format!("Failed to parse Matrix Market file: {:?}", path))?;

    let (nrow, ncol) = match &loaded {
        LoadedMatrix::Sparse(m) => (m.nrow(), m.ncol()),
        LoadedMatrix::Dense(m) => (m.nrow(), m.ncol()),
    };
    info!("Loaded {:?}: {} x {}", path, nrow, ncol);
    Ok(loaded)
}

/// Write the non-zero elements of `matrix` in coordinate real general format,
/// ordered by column.
pub fn write_matrix_market<T, M, W>(matrix: &M, mut writer: W) -> Result<()>
where
    T: Element + Display,
    M: Matrix<T> + ?Sized,
    W: Write,
{
    let fragmented = convert_to_fragmented_sparse(matrix, false, 1)?;
    let nnz: usize = fragmented.values().iter().map(Vec::len).sum();

    writeln!(writer, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(writer, "{} {} {}", matrix.nrow(), matrix.ncol(), nnz)?;
    for (c, (values, rows)) in fragmented.values().iter().zip(fragmented.indices()).enumerate() {
        for (x, r) in values.iter().zip(rows) {
            writeln!(writer, "{} {} {}", r + 1, c + 1, x)?;
        }
    }
    writer.flush()?;
    Ok(())
}
