//! Fixed instruction prompt for the vision model.

/// Instruction sent with every image. Asks for a single JSON object so the
/// reply can be mapped onto [`foliar_core::AnalysisResult`] directly; the
/// mapper still tolerates deviations (see `parser`).
pub const ANALYSIS_PROMPT: &str = r#"You are an expert plant pathologist with years of experience in diagnosing plant diseases. Analyze this leaf image carefully and provide a detailed, accurate diagnosis.

Respond with a single JSON object and nothing else, using exactly these keys:

{
  "disease_name": "specific disease name, or \"Healthy Leaf\" if no disease is detected",
  "confidence": "High | Medium | Low, based on image quality and visible symptoms",
  "description": "2-3 sentences describing the condition, what you observe, and why you reached this conclusion",
  "symptoms": ["3-5 specific visible symptoms"],
  "treatment": ["3-5 practical, actionable treatment steps, including organic and chemical options where applicable"],
  "prevention": ["3-5 prevention measures, including cultural practices and monitoring recommendations"],
  "severity": "Healthy | Mild | Moderate | Severe, based on the extent of infection"
}

Guidelines:
- Be specific about the plant species if identifiable
- Name the pathogen (fungus, bacteria, virus, pest) if known
- Provide recommendations suitable for both home gardeners and commercial growers
- If the image quality is poor or the disease is unclear, reflect this in the confidence level and description
"#;
