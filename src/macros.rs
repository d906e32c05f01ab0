/// Build a [`DataMapping`](crate::DataMapping) from `role => value` pairs.
///
/// Values go through `Into<MappingValue>`, so `&String`, `Option<&String>`,
/// `Vec<String>` and `bool` can be used directly.
#[macro_export]
macro_rules! mapping {
    ( $($role:literal => $value:expr),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut mapping = $crate::DataMapping::new();
        $( mapping.insert($role, $value); )*
        mapping
    }};
}

/// Declare a suggestion for a worksheet.
///
/// ```ignore
/// suggestion! {
///     viz: VizType::PieChart,
///     worksheet: ws,
///     title: "Pie Chart",
///     description: "...",
///     rationale: "...",
///     confidence: 0.55,
///     mapping: { "angle" => measure, "color" => dimension },
///     improvements: ["Emphasizes proportions"],
/// }
/// ```
///
/// The title gets " for <worksheet name>" appended.
#[macro_export]
macro_rules! suggestion {
    (
        viz: $viz:expr,
        worksheet: $ws:expr,
        title: $title:literal,
        description: $description:literal,
        rationale: $rationale:literal,
        confidence: $confidence:expr,
        mapping: { $($role:literal => $value:expr),* $(,)? },
        improvements: [ $($improvement:literal),* $(,)? ]
        $(,)?
    ) => {{
        let ws: &$crate::Worksheet = $ws;
        $crate::Suggestion::new(
            $viz,
            format!("{} for {}", $title, ws.name),
            $description,
            $rationale,
            $confidence,
            $crate::mapping! { $($role => $value),* },
            &ws.name,
            &[ $($improvement),* ],
        )
    }};
}
