use super::state::{or_unknown, TravelBudgetInfo};

pub const MISSING_BUDGET: &str = "Please provide your total travel budget first.";
pub const MISSING_DESTINATION: &str = "Please specify your travel destination first.";

pub fn general_prompt(info: &TravelBudgetInfo, user_message: &str) -> String {
    let destination = or_unknown(&info.trip_details.destination);
    let total_budget = or_unknown(&info.total_budget);
    let currency = &info.currency;
    let duration = or_unknown(&info.trip_details.duration_days);
    let expenses = info.expense_categories.to_json();
    format!(
        r#"You are a helpful travel budget assistant. The user has provided the following information:
Destination: {destination}
Total budget: {total_budget} {currency}
Duration: {duration} days
Current expenses: {expenses}

Please provide a helpful response to: {user_message}

Focus on:
1. Travel budget management
2. Destination-specific tips
3. Money-saving travel strategies
4. Local cost considerations
5. Travel planning advice
"#
    )
}

/// `None` when no total budget is known; the caller answers with
/// [`MISSING_BUDGET`] instead.
pub fn budget_breakdown_prompt(info: &TravelBudgetInfo) -> Option<String> {
    let total_budget = info.total_budget?;
    let destination = or_unknown(&info.trip_details.destination);
    let currency = &info.currency;
    let duration = or_unknown(&info.trip_details.duration_days);
    let travelers = or_unknown(&info.trip_details.travelers);
    let travel_dates = or_unknown(&info.trip_details.travel_dates);
    let expenses = info.expense_categories.to_json_pretty();
    Some(format!(
        r#"Create a detailed travel budget breakdown for a trip to {destination}
with a total budget of {total_budget} {currency}.

Trip duration: {duration} days
Travel dates: {travel_dates}
Number of travelers: {travelers}

Current expenses:
{expenses}

Provide a breakdown of:
1. Recommended allocation for each expense category
2. Daily budget per person
3. Tips for saving money in each category
4. Must-have experiences within budget
5. Emergency fund recommendation
6. Currency exchange tips

Include specific recommendations for:
- Finding affordable accommodation
- Transportation options
- Local food experiences
- Free or low-cost activities
- Shopping budget
"#
    ))
}

pub fn savings_prompt(info: &TravelBudgetInfo) -> String {
    let destination = or_unknown(&info.trip_details.destination);
    let total_budget = or_unknown(&info.total_budget);
    let currency = &info.currency;
    let duration = or_unknown(&info.trip_details.duration_days);
    let savings_goal = or_unknown(&info.savings_goal);
    format!(
        r#"Suggest travel savings strategies based on:
Destination: {destination}
Total budget: {total_budget} {currency}
Duration: {duration} days
Savings goal: {savings_goal} {currency}

Include:
1. Best time to book flights and accommodation
2. Money-saving travel hacks for {destination}
3. Local transportation tips
4. Free activities and attractions
5. Budget-friendly dining options
6. Currency exchange tips
7. Travel insurance considerations
"#
    )
}

/// `None` when no destination is known; the caller answers with
/// [`MISSING_DESTINATION`] instead.
pub fn local_tips_prompt(info: &TravelBudgetInfo) -> Option<String> {
    let destination = info.trip_details.destination.as_deref()?;
    Some(format!(
        r#"Provide budget tips specific to {destination}:

Include:
1. Local cost of living
2. Typical prices for common items/services
3. Best value areas to stay
4. Local transportation options and costs
5. Budget-friendly local experiences
6. Money-saving cultural tips
7. Common tourist traps to avoid
8. Best value local food options
"#
    ))
}
