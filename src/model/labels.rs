use crate::model::confusion::UnknownLabelPolicy;

/// Where the external network puts the pieces the extraction needs.
#[derive(Debug, Clone)]
pub struct LabelLayout {
    pub bins: Vec<i64>,
    pub names: Vec<String>,
    pub ghost_label: i64,
    pub ghost_score_index: usize,
    pub cosmic_column: usize,
    pub cosmic_flag: f64,
    pub non_cosmic_flag: f64,
    pub unknown_labels: UnknownLabelPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelOrigin {
    Cosmic,
    NonCosmic,
    Other,
}

impl LabelLayout {
    pub fn mlreco_v1() -> Self {
        Self {
            bins: vec![0, 1, 2, 3, 4, 5],
            names: [
                "proton",
                "MIPs",
                "e$^-$/e$^+$/$\\gamma$",
                "$\\Delta$-ray",
                "Michel",
                "ghost",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ghost_label: 5,
            ghost_score_index: 1,
            cosmic_column: 4,
            cosmic_flag: 1.0,
            non_cosmic_flag: 0.0,
            unknown_labels: UnknownLabelPolicy::Ignore,
        }
    }

    pub fn origin_of(&self, flag: f64) -> VoxelOrigin {
        if flag == self.cosmic_flag {
            VoxelOrigin::Cosmic
        } else if flag == self.non_cosmic_flag {
            VoxelOrigin::NonCosmic
        } else {
            VoxelOrigin::Other
        }
    }

    pub fn full_prediction(&self, segment: i64, ghost_argmax: usize) -> i64 {
        if ghost_argmax == self.ghost_score_index {
            self.ghost_label
        } else {
            segment
        }
    }
}
