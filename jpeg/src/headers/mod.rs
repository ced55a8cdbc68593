// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod jfif;
pub mod markers;
pub mod parser;
pub mod scan_header;
pub mod writer;

pub use frame_header::{ComponentSpec, FrameHeader};
pub use jfif::{DensityUnits, JfifHeader};
pub use scan_header::{ScanComponent, ScanHeader};
