/// Script characters billed as one credit.
pub const CHARS_PER_CREDIT: usize = 133;
/// Narration seconds produced per credit's worth of script.
pub const SECONDS_PER_CREDIT: f64 = 7.98;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct ScriptEstimate {
    pub characters: usize,
    pub credits: u32,
    pub narration_secs: f64,
}

impl ScriptEstimate {
    pub fn from_script(script: &str) -> Self {
        let characters = script.chars().count();
        Self {
            characters,
            credits: characters.div_ceil(CHARS_PER_CREDIT) as u32,
            narration_secs: characters as f64 / CHARS_PER_CREDIT as f64 * SECONDS_PER_CREDIT,
        }
    }
}
