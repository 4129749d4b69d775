//! Fixed word lists used by the rule-based language model and the keyword extractor.

use std::collections::HashSet;
use std::sync::LazyLock;

/// NLTK English stopword list.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Substrings that mark a sentence as talking about skills.
pub const SKILL_TRIGGERS: &[&str] = &["skill", "experience", "proficient", "knowledge", "expertise"];

/// Technology terms recognised as `Tech` entities. Multi-word entries are matched as token runs.
const TECH_TERMS: &[&str] = &[
    "python", "java", "javascript", "typescript", "rust", "go", "golang", "c", "c++", "c#",
    "ruby", "php", "scala", "kotlin", "swift", "r", "matlab", "perl", "haskell", "elixir",
    "sql", "nosql", "mysql", "postgresql", "postgres", "sqlite", "oracle", "mongodb", "redis",
    "cassandra", "elasticsearch", "dynamodb", "snowflake", "bigquery", "kafka", "rabbitmq",
    "spark", "hadoop", "airflow", "dbt", "tableau", "excel", "power bi", "looker",
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "terraform", "ansible",
    "jenkins", "github actions", "gitlab", "git", "linux", "unix", "bash", "ci/cd",
    "react", "angular", "vue", "svelte", "node.js", "nodejs", "express", "django", "flask",
    "fastapi", "spring", "spring boot", "rails", "ruby on rails", ".net", "asp.net", "graphql",
    "rest", "grpc", "html", "css", "sass", "webpack", "tensorflow", "pytorch", "keras",
    "scikit-learn", "pandas", "numpy", "jupyter", "machine learning", "deep learning",
    "natural language processing", "nlp", "computer vision", "data science", "data analysis",
    "microservices", "agile", "scrum", "jira", "figma", "salesforce", "sap", "ios", "android",
];

/// Trailing tokens that turn a proper-noun run into an organisation.
const ORG_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "corporation", "llc", "ltd", "ltd.", "gmbh", "co", "co.",
    "company", "group", "university", "college", "institute", "labs", "technologies",
    "systems", "solutions", "bank", "foundation",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "you", "your", "yours", "he",
    "him", "his", "she", "her", "hers", "it", "its", "they", "them", "their", "theirs", "who",
    "whom", "whose", "which", "what",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "out", "off", "over", "under", "across", "within", "without", "via", "per", "among",
    "toward", "towards", "upon", "including",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "because", "while", "although", "though", "if",
    "unless", "whereas", "as", "than",
];

/// Auxiliaries, modals and frequent verbs that carry no suffix cue.
const VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "am", "have", "has", "had", "do", "does", "did",
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "build",
    "built", "lead", "led", "run", "ran", "make", "made", "write", "wrote", "own", "drive",
    "drove", "grow", "grew", "work", "works", "use", "uses", "join", "seek", "seeking", "want",
    "need", "require", "requires", "develop", "design", "manage", "deliver", "ship", "create",
    "maintain", "implement", "collaborate", "mentor", "support", "ensure", "bring", "know",
    "get", "take", "help", "apply", "include", "includes",
];

const ADVERBS: &[&str] = &[
    "not", "very", "also", "too", "just", "well", "now", "then", "here", "there", "again",
    "often", "always", "never", "highly", "strongly",
];

pub static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

pub fn is_org_suffix(word: &str) -> bool {
    ORG_SUFFIXES.contains(&word)
}

pub fn is_determiner(word: &str) -> bool {
    DETERMINERS.contains(&word)
}

pub fn is_pronoun(word: &str) -> bool {
    PRONOUNS.contains(&word)
}

pub fn is_adposition(word: &str) -> bool {
    ADPOSITIONS.contains(&word)
}

pub fn is_conjunction(word: &str) -> bool {
    CONJUNCTIONS.contains(&word)
}

pub fn is_common_verb(word: &str) -> bool {
    VERBS.contains(&word)
}

pub fn is_common_adverb(word: &str) -> bool {
    ADVERBS.contains(&word)
}

/// Built-in technology gazetteer, lowercased.
pub fn builtin_tech_terms() -> impl Iterator<Item = &'static str> {
    TECH_TERMS.iter().copied()
}
