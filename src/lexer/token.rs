use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Keywords
    #[token("namespace")]
    Namespace,
    #[token("using")]
    Using,
    #[token("interface")]
    Interface,
    #[token("class")]
    Class,
    #[token("sealed")]
    Sealed,
    #[token("abstract")]
    Abstract,
    #[token("static")]
    Static,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,
    #[token("partial")]
    Partial,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("internal")]
    Internal,
    #[token("protected")]
    Protected,
    #[token("readonly")]
    Readonly,
    #[token("void")]
    Void,
    #[token("var")]
    Var,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("ref")]
    Ref,
    #[token("out")]
    Out,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Literals. Suffixes pick the numeric kind: L = long, f = float32,
    // m = decimal, no suffix with a dot or exponent = double.
    #[regex(r"[0-9][0-9_]*[lL]", |lex| {
        let s = lex.slice();
        s[..s.len()-1].replace('_', "").parse::<i64>().ok()
    })]
    LongLit(i64),

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?[fF]", |lex| {
        let s = lex.slice();
        s[..s.len()-1].replace('_', "").parse::<f32>().ok()
    })]
    FloatLit(f32),

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[mM]", |lex| {
        let s = lex.slice();
        Some(s[..s.len()-1].replace('_', ""))
    })]
    DecimalLit(String),

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[eE][+-]?[0-9]+|[0-9][0-9_]*\.[0-9][0-9_]*", |lex| {
        lex.slice().replace('_', "").parse::<f64>().ok()
    })]
    DoubleLit(f64),

    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<i64>().ok())]
    IntLit(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        let raw = &s[1..s.len()-1];
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('0') => result.push('\0'),
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some(other) => { result.push('\\'); result.push(other); }
                    None => result.push('\\'),
                }
            } else {
                result.push(c);
            }
        }
        Some(result)
    })]
    StringLit(String),

    #[regex(r"'([^'\\]|\\.)'", |lex| {
        let s = lex.slice();
        let raw = &s[1..s.len()-1];
        let mut chars = raw.chars();
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('n') => Some('\n'),
                Some('r') => Some('\r'),
                Some('t') => Some('\t'),
                Some('0') => Some('\0'),
                Some('\\') => Some('\\'),
                Some('\'') => Some('\''),
                other => other,
            },
            other => other,
        }
    })]
    CharLit(char),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Punctuation and operators
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,
    #[token("=")]
    Assign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    Comment,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Namespace => write!(f, "'namespace'"),
            Token::Using => write!(f, "'using'"),
            Token::Interface => write!(f, "'interface'"),
            Token::Class => write!(f, "'class'"),
            Token::Sealed => write!(f, "'sealed'"),
            Token::Abstract => write!(f, "'abstract'"),
            Token::Static => write!(f, "'static'"),
            Token::Virtual => write!(f, "'virtual'"),
            Token::Override => write!(f, "'override'"),
            Token::Partial => write!(f, "'partial'"),
            Token::Public => write!(f, "'public'"),
            Token::Private => write!(f, "'private'"),
            Token::Internal => write!(f, "'internal'"),
            Token::Protected => write!(f, "'protected'"),
            Token::Readonly => write!(f, "'readonly'"),
            Token::Void => write!(f, "'void'"),
            Token::Var => write!(f, "'var'"),
            Token::New => write!(f, "'new'"),
            Token::Return => write!(f, "'return'"),
            Token::Ref => write!(f, "'ref'"),
            Token::Out => write!(f, "'out'"),
            Token::This => write!(f, "'this'"),
            Token::True => write!(f, "'true'"),
            Token::False => write!(f, "'false'"),
            Token::Null => write!(f, "'null'"),
            Token::IntLit(n) => write!(f, "{n}"),
            Token::LongLit(n) => write!(f, "{n}L"),
            Token::FloatLit(n) => write!(f, "{n}f"),
            Token::DoubleLit(n) => write!(f, "{n}"),
            Token::DecimalLit(s) => write!(f, "{s}m"),
            Token::StringLit(s) => write!(f, "\"{s}\""),
            Token::CharLit(c) => write!(f, "'{c}'"),
            Token::Ident => write!(f, "identifier"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::Comma => write!(f, "','"),
            Token::Semi => write!(f, "';'"),
            Token::Dot => write!(f, "'.'"),
            Token::Colon => write!(f, "':'"),
            Token::Arrow => write!(f, "'=>'"),
            Token::Assign => write!(f, "'='"),
            Token::EqEq => write!(f, "'=='"),
            Token::BangEq => write!(f, "'!='"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::AmpAmp => write!(f, "'&&'"),
            Token::PipePipe => write!(f, "'||'"),
            Token::Bang => write!(f, "'!'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Comment => write!(f, "comment"),
        }
    }
}
