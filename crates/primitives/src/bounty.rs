// Copyright 2024 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The reward split an influencer asks for when extending a chain.
///
/// On the wire this is one byte: `0` is reserved, `1..=101` is a percentage plus one and
/// every other value asks the contract for its default (equal) split. The byte is kept
/// verbatim, so a cut always re-encodes to what was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BountyCut(NonZeroU8);

impl BountyCut {
    /// The canonical "equal split" byte.
    pub const EQUAL_SPLIT: u8 = 255;
    /// Largest explicit percentage.
    pub const MAX_PERCENTAGE: u8 = 100;

    /// Encodes an optional cut. Explicit values are passed through untouched.
    pub fn encode(cut: Option<u8>) -> u8 {
        cut.unwrap_or(Self::EQUAL_SPLIT)
    }

    /// Decodes a cut byte.
    pub fn decode(byte: u8) -> Result<Self, Error> {
        NonZeroU8::new(byte)
            .map(Self)
            .ok_or(Error::InvalidBountyCut)
    }

    /// An explicit share of `percent`, `None` above [BountyCut::MAX_PERCENTAGE].
    pub fn percent(percent: u8) -> Option<Self> {
        if percent > Self::MAX_PERCENTAGE {
            return None;
        }
        NonZeroU8::new(percent + 1).map(Self)
    }

    /// Returns the wire byte.
    pub fn to_byte(self) -> u8 {
        self.0.get()
    }

    /// Returns the requested percentage, or `None` for the default split.
    pub fn percentage(self) -> Option<u8> {
        match self.0.get() {
            byte @ 1..=101 => Some(byte - 1),
            _ => None,
        }
    }

    pub fn is_equal_split(self) -> bool {
        self.percentage().is_none()
    }
}

impl Default for BountyCut {
    fn default() -> Self {
        Self(NonZeroU8::MAX)
    }
}

impl TryFrom<u8> for BountyCut {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::decode(byte)
    }
}

impl From<BountyCut> for u8 {
    fn from(cut: BountyCut) -> Self {
        cut.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sentinel() {
        assert_eq!(BountyCut::encode(None), 255);
        let cut = BountyCut::decode(255).unwrap();
        assert_eq!(cut, BountyCut::default());
        assert!(cut.is_equal_split());
        assert_eq!(cut.percentage(), None);
        assert_eq!(cut.to_byte(), 255);
    }

    #[test]
    fn percentages() {
        assert_eq!(BountyCut::decode(1).unwrap().percentage(), Some(0));
        assert_eq!(BountyCut::decode(51).unwrap().percentage(), Some(50));
        assert_eq!(BountyCut::decode(101).unwrap().percentage(), Some(100));
        assert_eq!(BountyCut::percent(50), Some(BountyCut::decode(51).unwrap()));
        assert_eq!(BountyCut::percent(100).unwrap().to_byte(), 101);
        assert_eq!(BountyCut::encode(Some(42)), 42);
    }

    #[test]
    fn percentage_above_hundred_is_not_a_cut() {
        assert_eq!(BountyCut::percent(101), None);
        assert_eq!(BountyCut::percent(150), None);
        assert_eq!(BountyCut::percent(255), None);
    }

    #[test]
    fn other_values_are_opaque() {
        for byte in [102, 128, 151, 200, 254] {
            let cut = BountyCut::decode(byte).unwrap();
            assert!(cut.is_equal_split());
            assert_eq!(u8::from(cut), byte);
            assert_eq!(BountyCut::decode(cut.to_byte()), Ok(cut));
        }
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(BountyCut::decode(0), Err(Error::InvalidBountyCut));
        // encoding passes explicit values through; decoding is where 0 fails
        assert_eq!(BountyCut::encode(Some(0)), 0);
    }

    #[test]
    fn serde() {
        let cut = BountyCut::decode(11).unwrap();
        let json = serde_json::to_value(cut).unwrap();
        assert_eq!(json, serde_json::json!(11));
        assert_eq!(serde_json::from_value::<BountyCut>(json).unwrap(), cut);
        assert!(serde_json::from_value::<BountyCut>(serde_json::json!(0)).is_err());
    }
}
