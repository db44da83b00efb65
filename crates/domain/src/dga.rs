use std::collections::HashSet;
use std::sync::LazyLock;

/// Common words and fragments used to estimate how "word-like" a domain
/// label is. Random-looking labels share no long substring with this list.
static WORDS: &[&str] = &[
    "about", "access", "account", "admin", "agent", "alert", "analytics", "android", "api",
    "app", "apps", "archive", "asset", "assets", "audio", "auth", "backup", "bank", "base",
    "beta", "blog", "board", "book", "books", "box", "bridge", "browser", "build", "business",
    "cache", "calendar", "call", "camera", "card", "cart", "cast", "center", "central", "chat",
    "check", "class", "click", "client", "clock", "cloud", "code", "community", "config",
    "connect", "console", "contact", "content", "control", "core", "count", "cover", "craft",
    "create", "customer", "daily", "dash", "data", "date", "deal", "deck", "deliver", "demo",
    "design", "desk", "desktop", "detect", "develop", "device", "digital", "direct", "disc",
    "discover", "docs", "document", "domain", "down", "download", "drive", "earth", "east",
    "edge", "edit", "email", "energy", "engine", "enter", "event", "events", "exchange",
    "expert", "express", "fast", "feed", "field", "file", "files", "film", "filter", "finance",
    "find", "fire", "first", "flow", "focus", "font", "food", "form", "forum", "forward",
    "frame", "free", "fresh", "front", "game", "games", "gate", "gateway", "gear", "global",
    "gold", "graph", "green", "grid", "group", "guard", "guide", "hand", "head", "health",
    "help", "high", "home", "host", "hour", "house", "hub", "idea", "image", "images", "inbox",
    "index", "info", "insight", "install", "internal", "invoice", "item", "join", "keep",
    "key", "kind", "lab", "labs", "land", "launch", "layer", "learn", "level", "library",
    "life", "light", "line", "link", "list", "live", "local", "lock", "login", "logo", "long",
    "look", "loop", "mail", "main", "manage", "map", "maps", "mark", "market", "master",
    "match", "media", "meet", "member", "message", "meta", "metric", "micro", "mind", "mobile",
    "mode", "monitor", "moon", "more", "movie", "music", "name", "nest", "net", "network",
    "news", "next", "night", "node", "north", "note", "notes", "notify", "office", "online",
    "open", "order", "page", "pages", "panel", "paper", "park", "part", "partner", "pass",
    "path", "pay", "payment", "phone", "photo", "photos", "pixel", "place", "plan", "planet",
    "platform", "play", "player", "point", "portal", "post", "power", "press", "price",
    "prime", "print", "private", "product", "profile", "project", "proxy", "public", "pulse",
    "push", "quick", "radio", "rain", "rate", "read", "real", "record", "relay", "remote",
    "report", "research", "resource", "rest", "review", "ring", "river", "road", "rock",
    "root", "route", "safe", "sales", "save", "scan", "school", "score", "search", "secure",
    "security", "self", "send", "sense", "serve", "server", "service", "session", "share",
    "shell", "shield", "ship", "shop", "short", "show", "side", "sign", "signal", "site",
    "sky", "smart", "snap", "social", "soft", "software", "solution", "sound", "source",
    "south", "space", "spark", "speed", "sport", "spot", "stack", "staff", "stage", "star",
    "start", "stat", "state", "static", "station", "stats", "status", "steam", "stock",
    "storage", "store", "story", "stream", "street", "studio", "study", "style", "suite",
    "sun", "support", "sync", "system", "table", "talk", "team", "tech", "template", "test",
    "text", "theme", "ticket", "time", "tool", "tools", "top", "touch", "track", "trade",
    "traffic", "train", "transfer", "travel", "trust", "tube", "under", "unit", "update",
    "upload", "user", "users", "value", "vault", "video", "view", "virtual", "vision",
    "voice", "wall", "watch", "water", "wave", "weather", "web", "west", "wide", "wiki",
    "wind", "window", "wire", "word", "work", "works", "world", "write", "zone",
];

static DICTIONARY: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| WORDS.iter().copied().collect());

const MIN_SUBSTRING_LEN: usize = 3;

/// Longest-meaningful-substring score of a single label, in `[0, 10]`.
///
/// The score is ten times the fraction of the label covered by its longest
/// dictionary substring. Labels dominated by random characters score near
/// zero; labels built from real words score high.
pub fn lms_score(label: &str) -> f64 {
    if label.is_empty() {
        return 0.0;
    }
    let lower = label.to_ascii_lowercase();
    let longest = longest_meaningful_substring(&lower);
    10.0 * longest as f64 / lower.chars().count() as f64
}

/// Mean LMS score across the dot-separated labels of a domain.
pub fn lms_score_of_domain(domain: &str) -> f64 {
    let labels: Vec<&str> = domain
        .trim_end_matches('.')
        .split('.')
        .filter(|l| !l.is_empty())
        .collect();
    if labels.is_empty() {
        return 0.0;
    }
    labels.iter().map(|l| lms_score(l)).sum::<f64>() / labels.len() as f64
}

fn longest_meaningful_substring(label: &str) -> usize {
    let chars: Vec<char> = label.chars().collect();
    let n = chars.len();
    for len in (MIN_SUBSTRING_LEN..=n).rev() {
        for start in 0..=(n - len) {
            let candidate: String = chars[start..start + len].iter().collect();
            if DICTIONARY.contains(candidate.as_str()) {
                return len;
            }
        }
    }
    0
}
