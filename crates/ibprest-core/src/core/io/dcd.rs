use byteorder::{LittleEndian, ReadBytesExt};
use nalgebra::Point3;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const MAGIC: &[u8; 4] = b"CORD";
const HEADER_SIZE: usize = 92;
const TITLE_BLOCK_SIZE: usize = 172;
const TITLE_SIZE: usize = 160;
const ATOM_BLOCK_SIZE: usize = 12;
const FRAMES_START: usize = HEADER_SIZE + TITLE_BLOCK_SIZE + ATOM_BLOCK_SIZE;

#[derive(Debug, Error)]
pub enum DcdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Trajectory is truncated: need at least {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("Bad magic number: expected 'CORD', found {0:?}")]
    BadMagic([u8; 4]),
    #[error("Invalid atom count: {0}")]
    InvalidAtomCount(i32),
}

/// Fixed header fields of a DCD file.
#[derive(Debug, Clone, PartialEq)]
pub struct DcdHeader {
    /// The nine control integers following the magic number.
    pub control: [i32; 9],
    pub timestep: f64,
    /// The ten integers closing the header block.
    pub trailer: [i32; 10],
    /// Title text with trailing padding removed.
    pub title: String,
    pub atom_count: usize,
}

/// One frame of coordinates, in atom order.
pub type Frame = Vec<Point3<f64>>;

/// A binary trajectory of coordinate frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    header: DcdHeader,
    frames: Vec<Frame>,
}

fn read_header(cursor: &mut Cursor<&[u8]>) -> Result<DcdHeader, DcdError> {
    cursor.set_position(4);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(DcdError::BadMagic(magic));
    }

    let mut control = [0i32; 9];
    cursor.read_i32_into::<LittleEndian>(&mut control)?;
    let timestep = cursor.read_f64::<LittleEndian>()?;
    let mut trailer = [0i32; 10];
    cursor.read_i32_into::<LittleEndian>(&mut trailer)?;

    cursor.set_position((HEADER_SIZE + 8) as u64);
    let mut raw_title = [0u8; TITLE_SIZE];
    cursor.read_exact(&mut raw_title)?;
    let title = String::from_utf8_lossy(&raw_title)
        .trim_end_matches(['\0', ' '])
        .to_string();

    cursor.set_position((HEADER_SIZE + TITLE_BLOCK_SIZE + 4) as u64);
    let raw_count = cursor.read_i32::<LittleEndian>()?;
    let atom_count = match usize::try_from(raw_count) {
        Ok(count) if count > 0 => count,
        _ => return Err(DcdError::InvalidAtomCount(raw_count)),
    };

    Ok(DcdHeader {
        control,
        timestep,
        trailer,
        title,
        atom_count,
    })
}

/// Reads one frame block starting at the cursor: three Fortran records of
/// `f32` values, one per axis.
fn read_frame(cursor: &mut Cursor<&[u8]>, axes: &mut [Vec<f32>; 3]) -> Result<Frame, DcdError> {
    for axis in axes.iter_mut() {
        cursor.read_i32::<LittleEndian>()?;
        cursor.read_f32_into::<LittleEndian>(axis)?;
        cursor.read_i32::<LittleEndian>()?;
    }
    let [xs, ys, zs] = axes;
    Ok(xs
        .iter()
        .zip(ys.iter())
        .zip(zs.iter())
        .map(|((&x, &y), &z)| Point3::new(x as f64, y as f64, z as f64))
        .collect())
}

impl Trajectory {
    /// Decodes a little-endian DCD image.
    ///
    /// Frames are read while a complete frame block remains; trailing bytes
    /// shorter than a block are ignored.
    pub fn read_from_bytes(data: &[u8]) -> Result<Self, DcdError> {
        if data.len() < FRAMES_START {
            return Err(DcdError::Truncated {
                expected: FRAMES_START,
                found: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let header = read_header(&mut cursor)?;
        let atom_count = header.atom_count;

        let block_size = 24 + 12 * atom_count;
        let frame_count = (data.len() - FRAMES_START) / block_size;
        let mut axes = [
            vec![0f32; atom_count],
            vec![0f32; atom_count],
            vec![0f32; atom_count],
        ];
        cursor.set_position(FRAMES_START as u64);
        let frames = (0..frame_count)
            .map(|_| read_frame(&mut cursor, &mut axes))
            .collect::<Result<Vec<_>, _>>()?;

        let leftover = data.len() - FRAMES_START - frame_count * block_size;
        if leftover > 0 {
            warn!(
                bytes = leftover,
                "Ignoring incomplete frame at the end of the trajectory."
            );
        }
        debug!(atoms = atom_count, frames = frames.len(), "Decoded trajectory.");

        Ok(Self { header, frames })
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Self, DcdError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::read_from_bytes(&data)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DcdError> {
        let data = fs::read(path)?;
        Self::read_from_bytes(&data)
    }

    pub fn header(&self) -> &DcdHeader {
        &self.header
    }

    pub fn atom_count(&self) -> usize {
        self.header.atom_count
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// Encodes frames in the same layout the reader expects.
    pub(crate) fn encode(frames: &[Vec<[f32; 3]>], atoms: i32) -> Vec<u8> {
        let mut out = Vec::new();
        let push_i32 = |out: &mut Vec<u8>, v: i32| out.extend_from_slice(&v.to_le_bytes());

        push_i32(&mut out, 84);
        out.extend_from_slice(MAGIC);
        for v in [frames.len() as i32, 0, 1, 0, 0, 0, 0, 0, 0] {
            push_i32(&mut out, v);
        }
        out.extend_from_slice(&0.5f64.to_le_bytes());
        for _ in 0..10 {
            push_i32(&mut out, 0);
        }
        assert_eq!(out.len(), HEADER_SIZE);

        push_i32(&mut out, 164);
        push_i32(&mut out, 2);
        let mut title = [b' '; TITLE_SIZE];
        title[..11].copy_from_slice(b"test frames");
        out.extend_from_slice(&title);
        push_i32(&mut out, 164);

        push_i32(&mut out, 4);
        push_i32(&mut out, atoms);
        push_i32(&mut out, 4);

        for frame in frames {
            for axis in 0..3 {
                push_i32(&mut out, 4 * frame.len() as i32);
                for p in frame {
                    out.extend_from_slice(&p[axis].to_le_bytes());
                }
                push_i32(&mut out, 4 * frame.len() as i32);
            }
        }
        out
    }

    fn two_frames() -> Vec<Vec<[f32; 3]>> {
        vec![
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            vec![[-1.5, 0.25, 8.0], [0.0, -2.0, 1.0]],
        ]
    }

    #[test]
    fn decodes_header_and_frames() {
        let traj = Trajectory::read_from_bytes(&encode(&two_frames(), 2)).unwrap();
        assert_eq!(traj.atom_count(), 2);
        assert_eq!(traj.frame_count(), 2);
        assert_eq!(traj.header().title, "test frames");
        assert_eq!(traj.header().control[0], 2);
        assert!((traj.header().timestep - 0.5).abs() < 1e-12);
        assert_eq!(traj.frames()[0][1], Point3::new(4.0, 5.0, 6.0));
        assert_eq!(traj.frames()[1][0], Point3::new(-1.5, 0.25, 8.0));
    }

    #[test]
    fn incomplete_trailing_frame_is_dropped() {
        let mut data = encode(&two_frames(), 2);
        data.truncate(data.len() - 1);
        let traj = Trajectory::read_from(&mut Cursor::new(data)).unwrap();
        assert_eq!(traj.frame_count(), 1);
    }

    #[test]
    fn short_input_is_truncated() {
        let data = encode(&two_frames(), 2);
        assert!(matches!(
            Trajectory::read_from_bytes(&data[..200]),
            Err(DcdError::Truncated { expected: 276, found: 200 })
        ));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut data = encode(&two_frames(), 2);
        data[4..8].copy_from_slice(b"VELD");
        assert!(matches!(
            Trajectory::read_from_bytes(&data),
            Err(DcdError::BadMagic(m)) if &m == b"VELD"
        ));
    }

    #[test]
    fn non_positive_atom_count_is_rejected() {
        let data = encode(&[], -3);
        assert!(matches!(
            Trajectory::read_from_bytes(&data),
            Err(DcdError::InvalidAtomCount(-3))
        ));
        let data = encode(&[], 0);
        assert!(matches!(
            Trajectory::read_from_bytes(&data),
            Err(DcdError::InvalidAtomCount(0))
        ));
    }
}
