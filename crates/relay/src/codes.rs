//! Room code allocation.

use game_core::RoomCode;
use rand::Rng;

/// Number of distinct codes.
pub const CODE_SPACE: usize = (RoomCode::MAX - RoomCode::MIN + 1) as usize;

/// Draw uniformly from the code range until a free code comes up. Returns
/// `None` only when every code is taken.
pub fn allocate<R: Rng + ?Sized>(
    rng: &mut R,
    in_use: usize,
    taken: impl Fn(&RoomCode) -> bool,
) -> Option<RoomCode> {
    if in_use >= CODE_SPACE {
        return None;
    }
    loop {
        let code = RoomCode::from_number(rng.gen_range(RoomCode::MIN..=RoomCode::MAX))?;
        if !taken(&code) {
            return Some(code);
        }
    }
}

#[cfg(test)]
#[path = "codes_tests.rs"]
mod codes_tests;
