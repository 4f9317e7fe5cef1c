// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `collaborations` - collaboration rows with their events and options
//! - `directory` - parties, catalog options and stored files
//! - `audit` - audit trails

pub mod audit;
pub mod collaborations;
pub mod directory;
