//! Sentence Template Library
//!
//! Sentence templates for long-form chapter text, grouped into pools. The
//! active pool for one chapter is the shared exposition pool plus the pool for
//! the tone's register, with exam and regional pools added when the profile
//! asks for them.
//!
//! Placeholders: `{topic}`, `{term}`, `{term2}`, `{audience}`, `{region}`.

use super::profile::{Register, ToneProfile};

const EXPOSITION: &[&str] = &[
    "At its heart, {term} describes how the parts of {topic} fit together into a working whole.",
    "A useful first step is to separate what {term} measures from what it merely suggests.",
    "The relationship between {term} and {term2} is easiest to see when one of them is held constant.",
    "Most textbook treatments of {topic} introduce {term} early because so much later material depends on it.",
    "When {term} changes, {term2} rarely stays still, and tracing that link is a core skill.",
    "Precise definitions matter here, since everyday usage of {term} is looser than the technical sense.",
    "It helps to sketch a simple diagram that places {term} next to {term2} before doing any calculation.",
    "Historically, ideas about {term} developed in response to practical problems rather than abstract curiosity.",
    "The standard model of {term} rests on a small number of assumptions that are worth stating explicitly.",
    "Small errors in estimating {term} can grow quickly once they propagate through a multi-step analysis.",
    "A good mental check is to ask what would happen to {term2} if {term} doubled overnight.",
    "Units and scales deserve attention, because {term} is often quoted in more than one convention.",
    "The same principle behind {term} reappears in later chapters in a slightly different disguise.",
    "Comparing two contrasting cases makes the influence of {term} on {term2} much clearer.",
    "Practitioners in {topic} tend to reason about {term} in terms of limits and trade-offs rather than exact values.",
    "Whenever a result about {term} looks surprising, the first thing to revisit is the set of boundary conditions.",
    "There is a natural progression from describing {term} qualitatively to expressing it with numbers.",
    "Tables of typical values for {term2} are a practical aid, but they should never replace understanding.",
    "A careful reading of the problem statement usually reveals which aspect of {term} is actually being tested.",
    "Every model of {term} leaves something out, and knowing what is left out is part of mastering {topic}.",
    "Graphs that plot {term2} against {term} often reveal patterns that equations alone can hide.",
    "One common mistake is to treat {term} as fixed when it quietly depends on operating conditions.",
    "The vocabulary introduced here, especially {term} and {term2}, will be used without further definition later on.",
    "Real systems in {topic} rarely behave ideally, so the ideal case for {term} serves as a reference point.",
    "Breaking a large problem into stages lets each stage focus on a single aspect of {term}.",
    "An estimate made before a detailed calculation gives a valuable sanity check on the final answer for {term2}.",
    "Seen from a systems perspective, {term} is one lever among several that shape overall performance.",
    "Revisiting the definition of {term} after working a few problems often makes it feel far more concrete.",
    "The interplay of {term} and {term2} is where many of the interesting design decisions in {topic} are made.",
    "Case studies show that ignoring {term} early in a project tends to cause expensive corrections later.",
    "Summarizing each section in a sentence or two about {term} is a reliable way to consolidate learning.",
    "Before moving on, it is worth confirming that the link between {term} and {term2} feels intuitive.",
    "Measurements of {term} always come with uncertainty, and reporting that uncertainty is good practice.",
    "Analogies can make {term} easier to picture, provided their limits are kept firmly in mind.",
    "Later sections build directly on this treatment of {term}, so any gaps are worth closing now.",
    "Clear notation for {term} and {term2} prevents a surprising number of algebraic slips.",
];

const ACADEMIC: &[&str] = &[
    "The literature on {topic} consistently identifies {term} as a central explanatory variable.",
    "Formally, {term} may be characterised as a function of {term2} under stated conditions.",
    "It follows that any rigorous account of {topic} must specify how {term} is operationalised.",
    "Empirical studies report a robust association between {term} and {term2}, although causality requires care.",
    "A precise statement of the assumptions underlying {term} permits a more disciplined analysis.",
    "The theoretical treatment of {term} can be contrasted with its empirical estimation in applied work.",
    "Scholars distinguish between the descriptive and normative uses of {term} within {topic}.",
    "Under idealised conditions the behaviour of {term} admits a closed-form description.",
    "The validity of conclusions about {term2} depends critically on the measurement of {term}.",
    "Accordingly, the present chapter adopts the conventional definition of {term} used in {topic}.",
    "Methodological rigour demands that claims about {term} be tested against counterexamples.",
    "The generality of results concerning {term} is bounded by the scope of their derivation.",
];

const CONVERSATIONAL: &[&str] = &[
    "If {term} feels abstract right now, that is completely normal, and it will click with practice.",
    "You will notice that {term} keeps showing up, so it pays to get comfortable with it early.",
    "Think of {term} as a dial you can turn, and watch what happens to {term2} as you do.",
    "Here is a tip that learners in {audience} often find useful: explain {term} out loud in your own words.",
    "Do not worry about memorising every formula for {term}; focus on what each symbol means.",
    "Try pausing here and sketching how {term} and {term2} connect before reading on.",
    "It is fine to get {term} wrong the first few times, because each mistake sharpens your intuition.",
    "Picture yourself explaining {term} to a friend who has never studied {topic}.",
    "Once you see why {term} matters, the rest of this chapter becomes much easier to follow.",
    "You can test your understanding of {term} by predicting a result before you calculate it.",
    "Many learners say {term2} only made sense after they had worked through a real example.",
    "Take a moment to connect {term} with something you have already seen in daily life.",
];

const NEUTRAL: &[&str] = &[
    "This section explains {term} step by step and links it to {term2}.",
    "The main idea to carry forward is how {term} shapes outcomes in {topic}.",
    "A short review of {term} at this point prepares the ground for the next section.",
    "The discussion below keeps the focus on practical understanding of {term}.",
    "Key facts about {term} are collected here for quick reference.",
    "This part of the chapter shows where {term} fits within {topic} as a whole.",
    "A clear grasp of {term} makes the related material on {term2} more accessible.",
    "The following points outline how {term} is used in everyday work in {topic}.",
    "Each idea about {term} introduced here is revisited with an example later.",
    "Readers should be able to state the meaning of {term} in one sentence after this section.",
    "The treatment of {term} here is deliberately concise and focused on essentials.",
    "This overview of {term} connects earlier material with what comes next.",
];

const EXAM: &[&str] = &[
    "In examinations, questions on {term} often carry substantial marks, so a structured answer pays off.",
    "A strong exam answer on {term} states the definition, gives a diagram, and finishes with a worked example.",
    "Examiners frequently test the link between {term} and {term2} through short numerical problems.",
    "When revising {term}, practise writing answers within the time you would have in the actual paper.",
    "Past papers show that {term} appears regularly, often paired with a question on {term2}.",
    "Marks are commonly lost on {term} questions through missing units rather than wrong reasoning.",
    "A quick checklist for any {term} question is definition, assumptions, method, and a sensible final value.",
    "Underlining the data given for {term2} in the question paper helps avoid careless slips.",
];

const REGIONAL: &[&str] = &[
    "Examples from {region} show how {term} plays out under local conditions and constraints.",
    "Industry practice in {region} offers a useful lens on how {term} is applied day to day.",
    "For {audience}, relating {term} to familiar settings in {region} makes it far easier to retain.",
    "Local case studies from {region} illustrate how {term2} responds to changes in {term}.",
    "Cost and resource constraints common in {region} make careful reasoning about {term} especially valuable.",
    "Syllabi across {region} typically place {term} among the topics that reward consistent practice.",
];

/// Connectives occasionally prefixed to a sentence.
pub const CONNECTIVES: &[&str] = &[
    "In practice,",
    "Moreover,",
    "For this reason,",
    "By contrast,",
    "In many cases,",
    "As a result,",
    "Put simply,",
    "Importantly,",
    "At the same time,",
    "In short,",
];

/// Replace each `{name}` placeholder with its value.
pub fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (name, value) in slots {
        let placeholder = format!("{{{name}}}");
        result = result.replace(&placeholder, value);
    }
    result
}

/// The active template pool for a profile, in a fixed order.
pub fn active_pool(profile: &ToneProfile) -> Vec<&'static str> {
    let register_pool = match profile.register {
        Register::Academic => ACADEMIC,
        Register::Conversational => CONVERSATIONAL,
        Register::Neutral => NEUTRAL,
    };

    let mut pool: Vec<&'static str> = EXPOSITION.iter().chain(register_pool).copied().collect();
    if profile.exam_oriented {
        pool.extend_from_slice(EXAM);
    }
    if profile.region.is_some() {
        pool.extend_from_slice(REGIONAL);
    }
    pool
}

/// Prefix a connective, lowercasing the template's leading word.
///
/// Templates that open with a placeholder keep their casing, since the slot
/// value may be a proper noun.
pub fn with_connective(connective: &str, sentence: &str, template: &str) -> Option<String> {
    if template.starts_with('{') {
        return None;
    }
    let mut chars = sentence.chars();
    let first = chars.next()?;
    Some(format!("{connective} {}{}", first.to_lowercase(), chars.as_str()))
}
