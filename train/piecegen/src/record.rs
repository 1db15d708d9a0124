use serde::Serialize;

/// One line of `labels.jsonl`.
#[derive(Serialize, Debug)]
pub struct JsonRecord<'a> {
    pub schema: &'static str,
    pub image: String,
    pub label: &'static str,
    pub board_style: &'a str,
    pub square: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_set: Option<&'a str>,
    pub seed: u64,
}
