#![no_main]
use libfuzzer_sys::fuzz_target;
use louds::{Bit, BitSequence, BitVector, RankSelect};

fuzz_target!(|data: (Vec<bool>, usize)| {
    let (bits, probe) = data;
    if bits.is_empty() {
        return;
    }

    let seq: BitSequence = bits.iter().map(|&b| Bit::from(b)).collect();
    let bv = BitVector::from(&seq);
    let i = probe % bits.len();

    for bit in [Bit::Zero, Bit::One] {
        let rank = seq.rank(i, bit).unwrap();
        assert_eq!(RankSelect::rank(&bv, i, bit).unwrap(), rank);

        // The occurrence counted last by rank must sit at or before `i`.
        if rank > 0 {
            let pos = seq.select(rank, bit).unwrap().expect("occurrence exists");
            assert!(pos <= i);
            assert_eq!(seq.get(pos), Some(bit));
            assert_eq!(RankSelect::select(&bv, rank, bit).unwrap(), Some(pos));
        }
    }
});
