//! Structured form of the `NN-NNNN` occupation code.
//!
//! Depth is encoded by trailing zeros in the textual form:
//! `15-0000` major group, `15-1100` minor group, `15-1130` broad occupation,
//! `15-1132` detailed occupation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed SOC code '{0}', expected NN-NNNN")]
pub struct SocCodeError(pub String);

impl From<SocCodeError> for AppError {
    fn from(e: SocCodeError) -> Self {
        AppError::InvalidParameters(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SocLevel {
    Major,
    Minor,
    Broad,
    Detailed,
}

impl SocLevel {
    /// Maps the 1–4 drill-down level used by clients.
    pub fn from_number(level: i64) -> Result<Self, AppError> {
        match level {
            1 => Ok(SocLevel::Major),
            2 => Ok(SocLevel::Minor),
            3 => Ok(SocLevel::Broad),
            4 => Ok(SocLevel::Detailed),
            other => Err(AppError::InvalidLevel(other)),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            SocLevel::Major => 1,
            SocLevel::Minor => 2,
            SocLevel::Broad => 3,
            SocLevel::Detailed => 4,
        }
    }

    /// Prefix of the parent selection that codes at this level must share.
    ///
    /// Level 1 has no parent and always yields an empty prefix.
    pub fn parent_prefix(self, parent: Option<&str>) -> Result<String, AppError> {
        if self == SocLevel::Major {
            return Ok(String::new());
        }

        let parent = parent.map(str::trim).unwrap_or_default();
        if parent.is_empty() {
            return Err(AppError::InvalidParameters(format!(
                "InputSoc is required for level {}",
                self.number()
            )));
        }
        if !parent.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(AppError::InvalidParameters(format!(
                "InputSoc '{parent}' may only contain digits and '-'"
            )));
        }

        let prefix = match self {
            SocLevel::Minor => parent.split('-').next().unwrap_or_default(),
            SocLevel::Broad => parent.get(..4).unwrap_or_default(),
            SocLevel::Detailed => parent.get(..6).unwrap_or_default(),
            SocLevel::Major => unreachable!(),
        };
        if prefix.is_empty() {
            return Err(AppError::InvalidParameters(format!(
                "InputSoc '{parent}' is too short for level {}",
                self.number()
            )));
        }
        Ok(prefix.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SocCode {
    major: u8,
    minor: u8,
    broad: u8,
    detailed: u8,
}

impl SocCode {
    pub fn level(&self) -> SocLevel {
        match (self.minor, self.broad, self.detailed) {
            (0, 0, 0) => SocLevel::Major,
            (_, 0, 0) => SocLevel::Minor,
            (_, _, 0) => SocLevel::Broad,
            _ => SocLevel::Detailed,
        }
    }
}

impl FromStr for SocCode {
    type Err = SocCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SocCodeError(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() != 7 || bytes[2] != b'-' {
            return Err(malformed());
        }

        let digit = |i: usize| -> Result<u8, SocCodeError> {
            let b = bytes[i];
            if b.is_ascii_digit() {
                Ok(b - b'0')
            } else {
                Err(malformed())
            }
        };

        Ok(SocCode {
            major: digit(0)? * 10 + digit(1)?,
            minor: digit(3)? * 10 + digit(4)?,
            broad: digit(5)?,
            detailed: digit(6)?,
        })
    }
}

impl fmt::Display for SocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}{}{}",
            self.major, self.minor, self.broad, self.detailed
        )
    }
}
