/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
pub mod action;
pub mod bind;
pub mod cache;
pub mod channel;
pub mod compile;
pub mod extract;
pub mod field;
pub mod state;
