//! Compiled regex cache and shared pattern fragments

/// Declare a function returning a lazily compiled, process-wide regex.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

/// Month names accepted inside receipt dates, English (full or abbreviated)
/// and Arabic, as a non-capturing alternation.
macro_rules! month_names {
    () => {
        concat!(
            "(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?",
            "|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?",
            "|يناير|فبراير|مارس|أبريل|ابريل|إبريل|مايو|يونيو|يونيه|يوليو|يوليه",
            "|أغسطس|اغسطس|سبتمبر|أكتوبر|اكتوبر|نوفمبر|ديسمبر)"
        )
    };
}

/// Optional time of day following a date: `14:05`, `2:05:09 pm`, `09:30 م`
macro_rules! time_of_day {
    () => {
        r"(?:,? |t)(?:at )?([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?(?: ?(am|pm|ص|م)\b)?"
    };
}
