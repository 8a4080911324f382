#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use rechunkrs::{Rechunker, rechunk, split_buffer};

fuzz_target!(|input: (u16, Vec<u8>, Vec<u8>)| {
    let (chunk_size, cuts, data) = input;
    let chunk_size = chunk_size as usize + 1;

    // Cut the data into units at fuzzer-provided lengths (zero allowed)
    let data = Bytes::from(data);
    let mut units = Vec::new();
    let mut offset = 0;
    for cut in cuts {
        let end = (offset + cut as usize).min(data.len());
        units.push(data.slice(offset..end));
        offset = end;
    }
    units.push(data.slice(offset..));

    let chunks: Vec<Bytes> = rechunk(units.clone(), chunk_size)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    // Verify: output reproduces input
    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
    assert_eq!(&joined[..], &data[..]);

    // Verify: all chunks full except the last, which is never empty
    if let Some((last, rest)) = chunks.split_last() {
        assert!(rest.iter().all(|c| c.len() == chunk_size));
        assert!(!last.is_empty() && last.len() <= chunk_size);
    }

    // Verify: same chunks as splitting the whole buffer at once
    let split: Vec<Bytes> = split_buffer(data.clone(), chunk_size).unwrap().collect();
    assert_eq!(chunks, split);

    // Verify: push API agrees with the iterator
    let mut rechunker = Rechunker::new(chunk_size).unwrap();
    let mut pushed = Vec::new();
    for unit in units {
        pushed.extend(rechunker.push(unit).unwrap());
    }
    pushed.extend(rechunker.finish());
    assert_eq!(chunks, pushed);
});
