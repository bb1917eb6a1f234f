//! Variant sequences built from one seed message.

use codec::{encode_record, Codec, CodecResult, MessageRecord};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::FuzzConfig;
use crate::mutate::mutate_record;

/// Produces near-valid variants of well-formed messages.
#[derive(Debug, Clone)]
pub struct Fuzzer<'r> {
    codec: Codec<'r>,
    config: FuzzConfig,
}

impl<'r> Fuzzer<'r> {
    #[must_use]
    pub const fn new(codec: Codec<'r>, config: FuzzConfig) -> Self {
        Self { codec, config }
    }

    #[must_use]
    pub const fn config(&self) -> &FuzzConfig {
        &self.config
    }

    /// Decodes `seed` as a request and returns its variant sequence.
    pub fn fuzz(&self, seed: &[u8]) -> CodecResult<Mutations> {
        let record = self.codec.decode_request(seed)?.record;
        Ok(self.fuzz_record(record))
    }

    /// Decodes `seed` as a response to `request` and returns its variant sequence.
    pub fn fuzz_response(&self, seed: &[u8], request: &MessageRecord) -> CodecResult<Mutations> {
        let record = self.codec.decode_response(seed, request)?.record;
        Ok(self.fuzz_record(record))
    }

    /// Returns the variant sequence of an already decoded record.
    #[must_use]
    pub fn fuzz_record(&self, record: MessageRecord) -> Mutations {
        let rng_seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        Mutations::new(record, self.config.iterations, rng_seed)
    }
}

/// A lazy, finite sequence of encoded variants.
///
/// Each item is the seed record with its mutable fields randomized. The
/// sequence is determined by its RNG seed and can be replayed with
/// [`Mutations::restart`].
#[derive(Debug, Clone)]
pub struct Mutations {
    seed: MessageRecord,
    rng: StdRng,
    rng_seed: u64,
    iterations: usize,
    produced: usize,
}

impl Mutations {
    fn new(seed: MessageRecord, iterations: usize, rng_seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(rng_seed),
            rng_seed,
            iterations,
            produced: 0,
        }
    }

    /// The decoded seed message.
    #[must_use]
    pub const fn seed(&self) -> &MessageRecord {
        &self.seed
    }

    /// The RNG seed that determines this sequence.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Rewinds to the first variant.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.rng_seed);
        self.produced = 0;
    }

    /// Returns the next variant as a record instead of bytes.
    pub fn next_record(&mut self) -> Option<MessageRecord> {
        if self.produced == self.iterations {
            return None;
        }
        self.produced += 1;
        tracing::trace!(
            schema = %self.seed.schema.name,
            iteration = self.produced,
            of = self.iterations,
            "fuzz iteration"
        );
        Some(mutate_record(&self.seed, &mut self.rng))
    }
}

impl Iterator for Mutations {
    type Item = CodecResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().map(|record| encode_record(&record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.iterations - self.produced;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Mutations {}
