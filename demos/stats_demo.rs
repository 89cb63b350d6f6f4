use bucket_hash::ChainedHashTable;
use bucket_hash::HashFunction;
use bucket_hash::ProbingHashTable;
use bucket_hash::TableError;
use clap::Parser;
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Hash {
    Summation,
    Polynomial,
    Folded,
}

impl From<Hash> for HashFunction {
    fn from(value: Hash) -> Self {
        match value {
            Hash::Summation => HashFunction::Summation,
            Hash::Polynomial => HashFunction::Polynomial,
            Hash::Folded => HashFunction::Folded,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1013)]
    capacity: usize,

    /// Number of keys to insert, as a percentage of the capacity.
    #[arg(short = 'l', long = "load", default_value_t = 75)]
    load_percent: usize,

    #[arg(long = "hash", value_enum, default_value_t = Hash::Summation)]
    hash: Hash,
}

fn main() -> Result<(), TableError> {
    let args = Args::parse();
    let hash_fn = HashFunction::from(args.hash);
    let num_keys = args.capacity * args.load_percent / 100;

    println!(
        "Filling tables of capacity {} with {} keys using {:?}",
        args.capacity, num_keys, hash_fn
    );

    let mut chained = ChainedHashTable::try_new(args.capacity, hash_fn)?;
    let mut probing = ProbingHashTable::try_new(args.capacity, hash_fn)?;

    let mut num_failures = 0;
    for i in 0..num_keys {
        let key = format!("user_{i:05}");
        chained.put(key.clone(), i);
        match probing.put(key, i) {
            Ok(_) => {}
            Err(TableError::CapacityExhausted { .. }) => num_failures += 1,
            Err(err) => return Err(err),
        }
    }

    println!();
    println!("--- separate chaining ---");
    chained.chain_length_histogram().print();
    chained.stats().print();

    println!();
    println!("--- linear probing ---");
    probing.probe_histogram().print();
    probing.stats().print();
    println!(
        "Number of rejected inserts: {} ({:.02}%)",
        num_failures,
        num_failures as f64 / num_keys.max(1) as f64 * 100.0
    );

    Ok(())
}
