// Vocabulary embedding export.
//
// Turns a newline-delimited word list into CLIP text embeddings with a
// local ONNX encoder and persists the result as a safetensors artifact
// that the SAE training side of the pipeline consumes.

pub mod clip;
pub mod download;
pub mod export;
pub mod traits;
pub mod words;
