/// Derive a company code from a display name.
///
/// ASCII-lowercased; `&` reads as `and`; apostrophes vanish so possessives
/// stay one word; any other run of non-alphanumeric characters becomes a
/// single `-`. Non-ASCII characters are dropped. The result never starts or
/// ends with `-` and may be empty when the name has nothing usable.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut separate = false;

    for ch in name.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' => {
                push_separated(&mut slug, &mut separate);
                slug.push(ch.to_ascii_lowercase());
            }
            '&' => {
                separate = true;
                push_separated(&mut slug, &mut separate);
                slug.push_str("and");
                separate = true;
            }
            '\'' | '\u{2019}' => {}
            c if c.is_ascii() => separate = true,
            _ => {}
        }
    }

    slug
}

fn push_separated(slug: &mut String, separate: &mut bool) {
    if *separate && !slug.is_empty() {
        slug.push('-');
    }
    *separate = false;
}
