use wasm_bindgen::prelude::*;

use crate::generator::{generate, GeneratorParams};
use crate::letters::LetterBag;
use crate::wordlist::{find_valid_words, WordList};

#[wasm_bindgen(start)]
fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// JS entry: (letters: string, word_list: string[], params: object)
/// returns the full generation result (best puzzle, metrics, candidates).
///
/// `params` may be `null`/`undefined` or any subset of the generator
/// parameter fields; everything omitted takes its default.
#[wasm_bindgen]
pub fn generate_puzzle_wasm(
    letters: &str,
    word_list: JsValue,
    params: JsValue,
) -> Result<JsValue, JsValue> {
    // word_list: string[] -> Vec<String>
    let words: Vec<String> = serde_wasm_bindgen::from_value(word_list)
        .map_err(|e| JsValue::from_str(&format!("word_list must be string[]: {e}")))?;
    let dictionary = WordList::from_words(words);

    let params: GeneratorParams = if params.is_null() || params.is_undefined() {
        GeneratorParams::default()
    } else {
        serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("bad generator params: {e}")))?
    };

    let letter_vec: Vec<char> = letters.chars().collect();
    let result = generate(&letter_vec, &dictionary, &params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("serialization failed: {e}")))
}

/// JS entry: (letters: string, word_list: string[], min_len, max_len)
/// returns string[] — the spellable dictionary entries, longest first.
#[wasm_bindgen]
pub fn find_valid_words_wasm(
    letters: &str,
    word_list: JsValue,
    min_len: usize,
    max_len: usize,
) -> Result<JsValue, JsValue> {
    let words: Vec<String> = serde_wasm_bindgen::from_value(word_list)
        .map_err(|e| JsValue::from_str(&format!("word_list must be string[]: {e}")))?;
    let dictionary = WordList::from_words(words);

    let bag = LetterBag::from_word(letters).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let found = find_valid_words(&bag, &dictionary, min_len, max_len);

    serde_wasm_bindgen::to_value(&found)
        .map_err(|e| JsValue::from_str(&format!("serialization failed: {e}")))
}
