/// Creates a single conversation [`Turn`](crate::Turn) from a role shorthand.
///
/// ```rust
/// use lantern::{Role, turn};
///
/// let turn = turn!(assistant => "It works.");
/// assert_eq!(turn.role, Role::Assistant);
/// assert_eq!(turn.content, "It works.");
/// ```
#[macro_export]
macro_rules! turn {
    (user => $content:expr $(,)?) => {
        $crate::Turn::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Turn::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use user or assistant");
    };
}

/// Creates a `Vec<Turn>` from role/content pairs.
///
/// ```rust
/// use lantern::{Role, turns};
///
/// let history = turns![
///     user => "Explain this code",
///     assistant => "It works.",
/// ];
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[0].role, Role::User);
/// assert_eq!(history[1].role, Role::Assistant);
/// ```
#[macro_export]
macro_rules! turns {
    () => {
        Vec::<$crate::Turn>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::turn!($role => $content)),+]
    };
}
