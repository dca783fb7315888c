pub mod stage1_prepare;
pub mod stage2_extract;
pub mod stage3_evaluate;
pub mod stage4_persist;
