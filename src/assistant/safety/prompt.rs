use super::tips::SAFETY_CATEGORIES;

pub fn emergency_prompt(user_message: &str) -> String {
    format!(
        r#"The user has indicated an emergency situation: {user_message}

Provide immediate safety guidance that:
1. Starts with clear emergency instructions
2. Lists immediate actions to take
3. Includes emergency contact numbers
4. Provides step-by-step guidance
5. Emphasizes calm and clear thinking

Format as:
🚨 EMERGENCY RESPONSE
- Immediate Action 1
- Immediate Action 2
- Emergency Contacts
- Next Steps
"#
    )
}

pub fn health_prompt(user_message: &str) -> String {
    format!(
        r#"The user has a health-related query: {user_message}

Provide health and safety guidance that:
1. Starts with immediate health advice
2. Lists relevant health precautions
3. Includes basic first aid steps if applicable
4. Emphasizes when to seek professional medical help
5. Provides clear health safety guidelines

Format as:
🏥 HEALTH & SAFETY GUIDANCE
- Immediate Advice
- Health Precautions
- First Aid Steps (if applicable)
- When to Seek Medical Help
"#
    )
}

/// Prompt for anything the keyword groups did not claim. The model is told
/// not to ask a question itself since a follow-up is appended afterwards.
pub fn general_prompt(user_message: &str) -> String {
    let categories = SAFETY_CATEGORIES.join(", ");
    format!(
        r#"You are a helpful safety assistant. Help the user with their safety-related queries.
Available safety categories: {categories}

User query: {user_message}

Provide a clear and structured response that:
1. Starts with a brief, engaging introduction (1 sentence)
2. Uses emojis to make the response more visually appealing
3. Organizes information in clear subpoints with bullet points
4. Includes specific safety tips and guidelines
5. Uses clear and direct language
6. Emphasizes important safety information
7. Does not include a question at the end

Format your response as:
- Main response with emoji (1 sentence)
- Subpoint 1: [emoji] Detail
- Subpoint 2: [emoji] Detail
- Subpoint 3: [emoji] Detail
- No paragraphs or long text blocks
"#
    )
}
