// Copyright 2026 Logsieve Contributors
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

//! Stream subsystem for logsieve
//!
//! Everything between raw bytes and handler callbacks:
//!
//! - [`reader`] - the byte source contract plus slice and IO adapters
//! - [`protocol`] - tag encodings, value tags, and the version gate
//! - [`decoder`] - preamble and IR unit body decoding
//! - [`event`] - log events and node-id/value maps
//! - [`handler`] - the unit handler contract
//! - [`deserializer`] - the one-unit-per-call state machine

pub mod decoder;
pub mod deserializer;
pub mod event;
pub mod handler;
pub mod protocol;
pub mod reader;

pub use deserializer::{Deserializer, DeserializerBuilder};
pub use event::{LogEvent, NodeValueMap};
pub use handler::{NoopHandler, UnitHandler};
pub use protocol::{EncodingType, StreamVersion, UnitKind};
pub use reader::{IoReader, Reader, SliceReader};
