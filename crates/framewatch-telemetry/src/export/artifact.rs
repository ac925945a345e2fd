// Copyright 2025 eraflo
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

//! Reading artifacts back into samples.

use std::io;
use std::path::Path;

use crate::error::ArtifactError;
use crate::sample::{Sample, SampleLayout};

/// An artifact parsed back into its layout and samples.
///
/// Floats come back at the precision they were written with.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArtifact {
    /// The layout recovered from the header line.
    pub layout: SampleLayout,
    /// One sample per data line, in file order.
    pub samples: Vec<Sample>,
}

impl ParsedArtifact {
    /// Parses artifact text.
    pub fn parse(text: &str) -> Result<Self, ArtifactError> {
        let mut lines = text.lines().enumerate();
        let header = match lines.next() {
            Some((_, header)) if !header.is_empty() => header,
            _ => return Err(ArtifactError::Empty),
        };
        let layout = SampleLayout::from_header(header)?;

        let samples = lines
            .map(|(index, line)| layout.parse_row(index + 1, line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { layout, samples })
    }

    /// Reads and parses an artifact file.
    ///
    /// Malformed content is reported as [`io::ErrorKind::InvalidData`]
    /// wrapping the [`ArtifactError`].
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}
