use crate::parser::{ParsedCfg, ParsedRule};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, terminated, tuple};
use nom::IResult;

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedCfg> {
    map(
        delimited(
            many0(space_comment_line),
            separated_list1(many1(space_comment_line), rule),
            many0(space_comment_line),
        ),
        |rules| ParsedCfg { rules },
    )(input)
}

fn rule(input: &str) -> IResult<&str, ParsedRule> {
    map(
        delimited(
            space0,
            tuple((
                terminated(symbol_token, space1),
                terminated(arrow, space0),
                separated_list1(delimited(space0, tag("|"), space0), alternative),
            )),
            space_comment,
        ),
        |(head, _, alternatives)| ParsedRule { head, alternatives },
    )(input)
}

fn alternative(input: &str) -> IResult<&str, Vec<&str>> {
    alt((
        map(eps, |_| Vec::new()),
        separated_list1(space1, symbol_token),
    ))(input)
}

fn eps(input: &str) -> IResult<&str, ()> {
    map(alt((tag("ε"), tag("eps"))), |_| ())(input)
}

fn symbol_token(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || "#|".contains(c)),
        |token| !["ε", "eps", "→", "->"].contains(&token),
    )(input)
}

fn arrow(input: &str) -> IResult<&str, ()> {
    map(alt((tag("->"), tag("→"))), |_| ())(input)
}

fn space_comment_line(input: &str) -> IResult<&str, ()> {
    // We need to allow a space-only or comment-only line to end with either
    // a line ending or eof, but we need to consume *something* otherwise
    // many0(space_comment_line) will be in an endless loop at eof
    value(
        (),
        verify(
            recognize(terminated(space_comment, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

fn space_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(space0, opt(comment)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("#"), not_line_ending))(input)
}
