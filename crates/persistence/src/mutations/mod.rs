// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `audit` - audit event persistence
//! - `collaborations` - collaboration rows, events and options
//! - `directory` - parties, catalog options and stored files
//!
//! Every write that touches more than one table runs inside a single
//! database transaction.

pub mod audit;
pub mod collaborations;
pub mod directory;
