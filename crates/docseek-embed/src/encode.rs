use anyhow::{Result, anyhow};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// XLM-RoBERTa `<pad>` token id.
const PAD_ID: u32 = 1;

/// A single text, encoded to a fixed width.
pub struct Encoded {
    pub input_ids: Tensor,
    pub attention_mask: Tensor,
    /// Real (non-padding) tokens kept after truncation.
    pub tokens: usize,
}

/// Encode `text` to exactly `width` positions: truncated when longer, padded with `<pad>` when shorter.
pub fn encode_padded(tokenizer: &Tokenizer, text: &str, width: usize, device: &Device) -> Result<Encoded> {
    let encoding = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let tokens = encoding.get_ids().len().min(width);
    let mut ids: Vec<u32> = encoding.get_ids()[..tokens].to_vec();
    let mut mask: Vec<u32> = encoding.get_attention_mask()[..tokens].to_vec();
    ids.resize(width, PAD_ID);
    mask.resize(width, 0);
    Ok(Encoded {
        input_ids: Tensor::new(ids.as_slice(), device)?.unsqueeze(0)?,
        attention_mask: Tensor::new(mask.as_slice(), device)?.unsqueeze(0)?,
        tokens,
    })
}
