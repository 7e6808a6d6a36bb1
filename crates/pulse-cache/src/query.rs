use pulse_core::errors::PulseResult;

/// Query-result cache key: blake3 over the query text and the parameter
/// JSON. `serde_json` maps serialize with sorted keys, so parameter order
/// never changes the key.
pub fn query_key(query: &str, params: &serde_json::Value) -> PulseResult<String> {
    let params_json = serde_json::to_string(params)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(query.as_bytes());
    hasher.update(&[0]);
    hasher.update(params_json.as_bytes());
    Ok(format!("query:{}", &hasher.finalize().to_hex()[..32]))
}
