//! Skill detection for the resume upload summary.
//!
//! Plain substring matching against a fixed vocabulary. Presentation only:
//! detected skills are shown to the user and never feed a score.

const SKILL_VOCABULARY: &[(&str, &str)] = &[
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("rust", "Rust"),
    ("golang", "Go"),
    ("c++", "C++"),
    ("sql", "SQL"),
    ("react", "React"),
    ("node", "Node.js"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("spring", "Spring"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("git", "Git"),
    ("linux", "Linux"),
    ("machine learning", "Machine Learning"),
    ("deep learning", "Deep Learning"),
    ("data analysis", "Data Analysis"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("redis", "Redis"),
    ("postgres", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("rest api", "REST APIs"),
    ("microservices", "Microservices"),
];

/// Returns display names of vocabulary skills found in `text`, in vocabulary order.
pub fn detect_skills(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|(needle, _)| lower.contains(needle))
        .map(|(_, display)| *display)
        .collect()
}
