/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    pub version: Option<i32>,
}
