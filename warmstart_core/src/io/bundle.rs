//! Binary wire format for persisted warm-start bundles
//!
//! The format is an explicit, versioned schema so a bundle written by one
//! build can be read bit-exactly by another, independent of any language or
//! library serialization mechanism. All multi-byte integers are
//! little-endian:
//!
//! ```text
//! format_version   u8
//! state_kind       u8    0 = basis status, 1 = primal/dual
//! variable_count   u32
//! variable_names   [variable_count] u32-length-prefixed UTF-8
//! variable_values  [variable_count] u8 (basis, 0..=3) | f64 (primal/dual)
//! constraint_count u32
//! constraint_names [constraint_count] u32-length-prefixed UTF-8
//! constraint_values [constraint_count] u8 (basis, 0|1) | f64 (primal/dual)
//! ```
//!
//! `f64` values round-trip through [`f64::to_le_bytes`], so persisted
//! primal/dual state is bit-exact. Reading validates the version byte, the
//! state kind, name encodings, and value ranges, and rejects both truncated
//! and over-long files with [`WarmStartError::CorruptBundle`].
//!
//! A bundle file is written by one writer and later read by one reader;
//! concurrent access to the same path is not guarded at this layer.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::optimize::warm_start::bundle::{BundleData, WarmStartBundle};
use crate::optimize::warm_start::store::NamedStateStore;
use crate::optimize::warm_start::WarmStartError;

/// Wire format version, bumped on layout changes
const FORMAT_VERSION: u8 = 1;

/// State kind tag for basis bundles
const KIND_BASIS: u8 = 0;
/// State kind tag for primal/dual bundles
const KIND_PRIMAL_DUAL: u8 = 1;

/// Write a bundle to a file at `path`
pub fn persist_bundle(path: &Path, bundle: &WarmStartBundle) -> Result<(), WarmStartError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_bundle(&mut writer, bundle)?;
    writer.flush()?;
    Ok(())
}

/// Read a bundle from a file at `path`
pub fn load_bundle(path: &Path) -> Result<WarmStartBundle, WarmStartError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WarmStartError::BundleNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    let mut reader = BufReader::new(file);
    let bundle = read_bundle(&mut reader)?;
    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        return Err(corrupt("trailing bytes after constraint values"));
    }
    Ok(bundle)
}

/// Write a bundle to any writer
pub fn write_bundle<W: Write>(writer: &mut W, bundle: &WarmStartBundle) -> Result<(), WarmStartError> {
    writer.write_all(&[FORMAT_VERSION])?;
    match bundle.data() {
        BundleData::Basis {
            variables,
            constraints,
        } => {
            writer.write_all(&[KIND_BASIS])?;
            write_block(writer, variables, |w, &byte| w.write_all(&[byte]))?;
            write_block(writer, constraints, |w, &flag| w.write_all(&[flag as u8]))?;
        }
        BundleData::PrimalDual {
            variables,
            constraints,
        } => {
            writer.write_all(&[KIND_PRIMAL_DUAL])?;
            write_block(writer, variables, |w, &value| {
                w.write_all(&value.to_le_bytes())
            })?;
            write_block(writer, constraints, |w, &value| {
                w.write_all(&value.to_le_bytes())
            })?;
        }
    }
    Ok(())
}

/// Read a bundle from any reader
///
/// Does not check for trailing data; [`load_bundle`] does that at the file
/// level.
pub fn read_bundle<R: Read>(reader: &mut R) -> Result<WarmStartBundle, WarmStartError> {
    let version = read_u8(reader)?;
    if version != FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {version}, expected {FORMAT_VERSION}"
        )));
    }
    let data = match read_u8(reader)? {
        KIND_BASIS => {
            let variables = read_block(reader, read_variable_basis_byte)?;
            let constraints = read_block(reader, read_bool)?;
            BundleData::Basis {
                variables,
                constraints,
            }
        }
        KIND_PRIMAL_DUAL => {
            let variables = read_block(reader, read_f64)?;
            let constraints = read_block(reader, read_f64)?;
            BundleData::PrimalDual {
                variables,
                constraints,
            }
        }
        other => return Err(corrupt(format!("unknown state kind {other}"))),
    };
    Ok(WarmStartBundle::from_data(data))
}

/// Write one count-prefixed block: all names, then all values
fn write_block<W: Write, T, F>(
    writer: &mut W,
    store: &NamedStateStore<T>,
    mut write_value: F,
) -> Result<(), WarmStartError>
where
    F: FnMut(&mut W, &T) -> io::Result<()>,
{
    writer.write_all(&(store.len() as u32).to_le_bytes())?;
    for (name, _) in store.entries() {
        writer.write_all(&(name.len() as u32).to_le_bytes())?;
        writer.write_all(name.as_bytes())?;
    }
    for (_, value) in store.entries() {
        write_value(writer, value)?;
    }
    Ok(())
}

/// Read one count-prefixed block into a fresh store
fn read_block<R: Read, T, F>(
    reader: &mut R,
    mut read_value: F,
) -> Result<NamedStateStore<T>, WarmStartError>
where
    F: FnMut(&mut R) -> Result<T, WarmStartError>,
{
    let count = read_u32(reader)? as usize;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(read_string(reader)?);
    }
    let mut store = NamedStateStore::with_capacity(count);
    for name in names {
        let value = read_value(reader)?;
        store.append(name, value)?;
    }
    Ok(store)
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, WarmStartError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf).map_err(map_read_error)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, WarmStartError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(map_read_error)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64, WarmStartError> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf).map_err(map_read_error)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, WarmStartError> {
    let len = read_u32(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(map_read_error)?;
    String::from_utf8(buf).map_err(|_| corrupt("name is not valid UTF-8"))
}

fn read_variable_basis_byte<R: Read>(reader: &mut R) -> Result<u8, WarmStartError> {
    let byte = read_u8(reader)?;
    if byte > 3 {
        return Err(corrupt(format!("variable basis byte {byte} out of range")));
    }
    Ok(byte)
}

fn read_bool<R: Read>(reader: &mut R) -> Result<bool, WarmStartError> {
    match read_u8(reader)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(corrupt(format!("constraint basis byte {other} out of range"))),
    }
}

/// A short read means the declared counts and the data disagree
fn map_read_error(e: io::Error) -> WarmStartError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        corrupt("truncated bundle")
    } else {
        e.into()
    }
}

fn corrupt(reason: impl Into<String>) -> WarmStartError {
    WarmStartError::CorruptBundle(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis_bundle() -> WarmStartBundle {
        let mut variables = NamedStateStore::new();
        variables.append("x1", 2u8).unwrap();
        variables.append("x2", 1u8).unwrap();
        let mut constraints = NamedStateStore::new();
        constraints.append("c1", true).unwrap();
        WarmStartBundle::from_data(BundleData::Basis {
            variables,
            constraints,
        })
    }

    fn primal_dual_bundle() -> WarmStartBundle {
        let mut variables = NamedStateStore::new();
        variables.append("x1", 1.25f64).unwrap();
        variables.append("x2", -7.5e300).unwrap();
        variables.append("x3", f64::MIN_POSITIVE).unwrap();
        let mut constraints = NamedStateStore::new();
        constraints.append("c1", 0.1).unwrap();
        WarmStartBundle::from_data(BundleData::PrimalDual {
            variables,
            constraints,
        })
    }

    fn encode(bundle: &WarmStartBundle) -> Vec<u8> {
        let mut buf = Vec::new();
        write_bundle(&mut buf, bundle).unwrap();
        buf
    }

    #[test]
    fn basis_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basis.warmstart");
        let bundle = basis_bundle();

        persist_bundle(&path, &bundle).unwrap();
        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn primal_dual_round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.warmstart");
        let bundle = primal_dual_bundle();

        persist_bundle(&path, &bundle).unwrap();
        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn wire_layout_is_stable() {
        let mut variables = NamedStateStore::new();
        variables.append("x", 3u8).unwrap();
        let bundle = WarmStartBundle::from_data(BundleData::Basis {
            variables,
            constraints: NamedStateStore::new(),
        });

        let expected = [
            1, // format version
            0, // basis state kind
            1, 0, 0, 0, // variable count
            1, 0, 0, 0, // name length
            b'x', // name
            3,    // encoded superbasic
            0, 0, 0, 0, // constraint count
        ];
        assert_eq!(encode(&bundle), expected);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match load_bundle(&dir.path().join("absent.warmstart")) {
            Err(WarmStartError::BundleNotFound(_)) => {}
            other => panic!("Missing bundle file not caught: {other:?}"),
        }
    }

    #[test]
    fn unknown_version_rejected() {
        let mut bytes = encode(&basis_bundle());
        bytes[0] = 9;
        match read_bundle(&mut bytes.as_slice()) {
            Err(WarmStartError::CorruptBundle(reason)) => {
                assert!(reason.contains("version"), "unexpected reason: {reason}")
            }
            other => panic!("Unknown format version not caught: {other:?}"),
        }
    }

    #[test]
    fn unknown_state_kind_rejected() {
        let mut bytes = encode(&basis_bundle());
        bytes[1] = 2;
        match read_bundle(&mut bytes.as_slice()) {
            Err(WarmStartError::CorruptBundle(reason)) => {
                assert!(reason.contains("state kind"), "unexpected reason: {reason}")
            }
            other => panic!("Unknown state kind not caught: {other:?}"),
        }
    }

    #[test]
    fn truncated_bundle_rejected() {
        let bytes = encode(&primal_dual_bundle());
        // Chop in the middle of the value arrays
        let mut truncated = &bytes[..bytes.len() - 3];
        match read_bundle(&mut truncated) {
            Err(WarmStartError::CorruptBundle(reason)) => {
                assert!(reason.contains("truncated"), "unexpected reason: {reason}")
            }
            other => panic!("Truncated bundle not caught: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_basis_byte_rejected() {
        let mut bytes = encode(&basis_bundle());
        // The two variable value bytes sit right before the constraint block
        let constraint_block_len = 4 + 4 + 2 + 1;
        let variable_values_at = bytes.len() - constraint_block_len - 2;
        bytes[variable_values_at] = 4;
        match read_bundle(&mut bytes.as_slice()) {
            Err(WarmStartError::CorruptBundle(reason)) => {
                assert!(
                    reason.contains("out of range"),
                    "unexpected reason: {reason}"
                )
            }
            other => panic!("Out of range basis byte not caught: {other:?}"),
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padded.warmstart");
        let mut bytes = encode(&basis_bundle());
        bytes.push(0);
        std::fs::write(&path, &bytes).unwrap();

        match load_bundle(&path) {
            Err(WarmStartError::CorruptBundle(reason)) => {
                assert!(reason.contains("trailing"), "unexpected reason: {reason}")
            }
            other => panic!("Trailing bytes not caught: {other:?}"),
        }
    }
}
