// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod data_types;
mod decoder;
mod encoder;
mod limits;
mod options;

pub use data_types::*;
pub use decoder::*;
pub use encoder::*;
pub use limits::*;
pub use options::*;
