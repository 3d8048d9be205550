/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
pub mod axis;
pub mod chart;
pub mod data;
pub mod legend;
pub mod lite;
pub mod mark;
pub mod scale;
pub mod values;
pub mod visitors;
