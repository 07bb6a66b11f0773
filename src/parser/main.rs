use crate::error::{BpltError, Result};
use crate::parser::channel::decode_channels;
use crate::parser::header::decode_header;
use crate::parser::stream::BpltDataStream;
use crate::types::*;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Initial prefix read when decoding a header; doubled while the header
/// still runs past the bytes read so far
pub const HEADER_CHUNK_SIZE: usize = 64 * 1024;

/// Open a BPLT file for buffered reading
pub fn open_bplt_file(file_path: &Path) -> Result<BufReader<File>> {
    let file = File::open(file_path).map_err(|source| BpltError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Decode the header from the start of `reader`, reading only the prefix
/// the header occupies.
///
/// The reader is left somewhere past the header; use
/// [`FileHeader::header_position`] to find the channel data.
pub fn read_header_from<R: Read>(reader: &mut R) -> Result<FileHeader> {
    let mut prefix = Vec::new();
    loop {
        let wanted = prefix.len().max(HEADER_CHUNK_SIZE);
        let got = reader
            .by_ref()
            .take(wanted as u64)
            .read_to_end(&mut prefix)?;
        let exhausted = got < wanted;

        let mut stream = BpltDataStream::new(&prefix);
        let result = decode_header(&mut stream);
        // A header that never touched the end of the prefix is final
        if !stream.eof || exhausted {
            debug!("Header decoded from {} byte prefix", prefix.len());
            return result;
        }
        debug!("Header runs past {} bytes, reading further", prefix.len());
    }
}

/// Decode only the header of in-memory BPLT data
pub fn read_header_bytes(data: &[u8]) -> Result<FileHeader> {
    let mut stream = BpltDataStream::new(data);
    decode_header(&mut stream)
}

/// Decode only the header of a BPLT file
pub fn read_header_file(file_path: &Path) -> Result<FileHeader> {
    let mut reader = open_bplt_file(file_path)?;
    read_header_from(&mut reader)
}

/// Decode the channel data section that follows an already decoded header
pub fn read_channel_data(data: &[u8], header: &FileHeader) -> Result<ChannelSet> {
    let mut stream = BpltDataStream::new(data);
    stream.set_position(header.header_position);
    decode_channels(&mut stream, &header.channel_names)
}

/// Seek past the header and decode the channel data section of `reader`
pub fn read_channel_section<R: Read + Seek>(
    reader: &mut R,
    header: &FileHeader,
) -> Result<ChannelSet> {
    reader.seek(SeekFrom::Start(header.header_position as u64))?;
    let mut section = Vec::new();
    reader.read_to_end(&mut section)?;
    debug!(
        "Read channel section: {} bytes ({:.2} MB)",
        section.len(),
        section.len() as f64 / 1024.0 / 1024.0
    );

    let mut stream = BpltDataStream::new(&section);
    decode_channels(&mut stream, &header.channel_names)
}

/// Decode header and channel data from memory
pub fn read_bplt_bytes(data: &[u8]) -> Result<BpltFile> {
    let header = read_header_bytes(data)?;
    let channels = read_channel_data(data, &header)?;
    Ok(BpltFile { header, channels })
}

/// Decode header and channel data from a file
pub fn read_bplt_file(file_path: &Path) -> Result<BpltFile> {
    let mut reader = open_bplt_file(file_path)?;
    let header = read_header_from(&mut reader)?;
    let channels = read_channel_section(&mut reader, &header)?;
    Ok(BpltFile { header, channels })
}
