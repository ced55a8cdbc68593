// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod coeff_order;
pub mod decode;
pub mod encode;
pub mod mcu;
pub mod quantizer;
