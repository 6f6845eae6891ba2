//! Reader and writer for 2-D feature matrices in the NumPy `.npy` format.
//!
//! Matrices are always written as `|u1` in C order. Reading also accepts
//! Fortran order and the common boolean/integer element types, as long as
//! every value is 0 or 1.

use crate::features::FeatureMatrix;
use crate::{Error, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, value},
    multi::separated_list0,
    number::complete::{le_u16, le_u32, u8 as byte},
    sequence::{delimited, pair, separated_pair},
    IResult,
};
use std::io::Write;
use std::path::Path;

const MAGIC: &[u8] = b"\x93NUMPY";
/// Magic, version and the 2-byte header length of a v1.0 file
const PREAMBLE_LEN: usize = 10;
const ALIGNMENT: usize = 64;

/// Serializes `matrix` as a v1.0 `.npy` file
pub fn encode(matrix: &FeatureMatrix) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '|u1', 'fortran_order': False, 'shape': ({}, {}), }}",
        matrix.rows(),
        matrix.cols()
    );
    // Header ends in '\n' and the data starts on an aligned offset
    let padding = (ALIGNMENT - (PREAMBLE_LEN + header.len() + 1) % ALIGNMENT) % ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(PREAMBLE_LEN + header.len() + matrix.as_bytes().len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(matrix.as_bytes());
    out
}

pub fn write<W: Write>(writer: &mut W, matrix: &FeatureMatrix) -> std::io::Result<()> {
    writer.write_all(&encode(matrix))
}

pub fn write_file(path: &Path, matrix: &FeatureMatrix) -> Result<()> {
    std::fs::write(path, encode(matrix)).map_err(|e| Error::io(path, e))
}

pub fn read_file(path: &Path) -> Result<FeatureMatrix> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    decode(&bytes)
}

/// Parses a `.npy` file holding a 2-D 0/1 matrix
pub fn decode(bytes: &[u8]) -> Result<FeatureMatrix> {
    let (data, header) = preamble(bytes)
        .map_err(|_| Error::Npy("missing or unsupported preamble".to_string()))?;
    let header = std::str::from_utf8(header)
        .map_err(|_| Error::Npy("header is not valid UTF-8".to_string()))?;
    let header = parse_header(header)?;

    let (rows, cols) = match header.shape.as_slice() {
        &[rows, cols] => (rows, cols),
        shape => return Err(Error::Npy(format!("expected a 2-D array, shape is {shape:?}"))),
    };
    let width = element_width(&header.descr)?;
    let (len, bytes) = rows
        .checked_mul(cols)
        .and_then(|len| Some((len, len.checked_mul(width)?)))
        .ok_or_else(|| Error::Npy(format!("shape ({rows}, {cols}) overflows")))?;
    if data.len() < bytes {
        return Err(Error::Npy(format!(
            "expected {bytes} data bytes, found {}",
            data.len()
        )));
    }

    let mut values = vec![0u8; len];
    for (k, chunk) in data[..bytes].chunks_exact(width).enumerate() {
        // Fortran order stores column by column
        let (row, col) = if header.fortran_order {
            (k % rows, k / rows)
        } else {
            (k / cols, k % cols)
        };
        values[row * cols + col] = binary_value(chunk).ok_or_else(|| Error::NonBinaryValue {
            row,
            col,
            value: little_endian(chunk),
        })?;
    }
    FeatureMatrix::from_raw(rows, cols, values)
}

/// Parsed header dictionary
#[derive(Debug, Clone, PartialEq)]
struct Header {
    descr: String,
    fortran_order: bool,
    shape: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Bool(bool),
    Tuple(Vec<usize>),
}

/// Magic and version, returning the header bytes and leaving the data
fn preamble(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, _) = tag(MAGIC)(input)?;
    let (input, major) = byte(input)?;
    let (input, _minor) = byte(input)?;
    let (input, len) = if major == 1 {
        map(le_u16, usize::from)(input)?
    } else {
        map(le_u32, |v| v as usize)(input)?
    };
    take(len)(input)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// `()`, `(3,)` or `(3, 4)`
fn tuple(input: &str) -> IResult<&str, Vec<usize>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), parse_usize),
        pair(opt(ws(char(','))), char(')')),
    )(input)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(string_literal, |s| Literal::Str(s.to_string())),
        value(Literal::Bool(true), tag("True")),
        value(Literal::Bool(false), tag("False")),
        map(tuple, Literal::Tuple),
    ))(input)
}

fn dict(input: &str) -> IResult<&str, Vec<(&str, Literal)>> {
    delimited(
        ws(char('{')),
        separated_list0(
            char(','),
            separated_pair(ws(string_literal), char(':'), ws(literal)),
        ),
        pair(opt(char(',')), ws(char('}'))),
    )(input)
}

fn parse_header(input: &str) -> Result<Header> {
    let (_, entries) =
        dict(input).map_err(|e| Error::Npy(format!("cannot parse header {input:?}: {e}")))?;

    let mut descr = None;
    let mut fortran_order = None;
    let mut shape = None;
    for (key, literal) in entries {
        match (key, literal) {
            ("descr", Literal::Str(s)) => descr = Some(s),
            ("fortran_order", Literal::Bool(b)) => fortran_order = Some(b),
            ("shape", Literal::Tuple(t)) => shape = Some(t),
            (key, literal) => {
                return Err(Error::Npy(format!("unexpected header entry {key:?}: {literal:?}")))
            }
        }
    }

    let missing = |key: &str| Error::Npy(format!("header has no {key:?} entry"));
    Ok(Header {
        descr: descr.ok_or_else(|| missing("descr"))?,
        fortran_order: fortran_order.ok_or_else(|| missing("fortran_order"))?,
        shape: shape.ok_or_else(|| missing("shape"))?,
    })
}

/// Byte width of a supported little-endian/byte-sized element type
fn element_width(descr: &str) -> Result<usize> {
    match descr {
        "|b1" | "|u1" | "|i1" | "<u1" | "<i1" => Ok(1),
        "<u2" | "<i2" => Ok(2),
        "<u4" | "<i4" => Ok(4),
        "<u8" | "<i8" => Ok(8),
        other => Err(Error::UnsupportedElementType(other.to_string())),
    }
}

/// 0 or 1 if `chunk` encodes exactly that value
fn binary_value(chunk: &[u8]) -> Option<u8> {
    match chunk.split_first() {
        Some((&first, rest)) if first <= 1 && rest.iter().all(|&b| b == 0) => Some(first),
        _ => None,
    }
}

fn little_endian(chunk: &[u8]) -> i64 {
    chunk
        .iter()
        .rev()
        .fold(0i64, |acc, &b| (acc << 8) | i64::from(b))
}
