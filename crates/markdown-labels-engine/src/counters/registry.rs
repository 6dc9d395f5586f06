use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::algorithms::ChineseSymbols;
use super::style::{CounterStyle, System, symbols};

/// Single-character shorthands accepted wherever a style name is.
const ALIASES: [(&str, &str); 6] = [
    ("1", "decimal"),
    ("a", "lower-alpha"),
    ("A", "upper-alpha"),
    ("i", "lower-roman"),
    ("I", "upper-roman"),
    ("cjk-ideographic", "trad-chinese-informal"),
];

const DECIMAL_BASES: [(&str, u32); 29] = [
    ("arabic-indic", 0x0660),
    ("persian", 0x06F0),
    ("urdu", 0x06F0),
    ("devanagari", 0x0966),
    ("marathi", 0x0966),
    ("bengali", 0x09E6),
    ("gurmukhi", 0x0A66),
    ("gujarati", 0x0AE6),
    ("oriya", 0x0B66),
    ("tamil", 0x0BE6),
    ("telugu", 0x0C66),
    ("kannada", 0x0CE6),
    ("malayalam", 0x0D66),
    ("thai", 0x0E50),
    ("lao", 0x0ED0),
    ("tibetan", 0x0F20),
    ("myanmar", 0x1040),
    ("khmer", 0x17E0),
    ("cambodian", 0x17E0),
    ("mongolian", 0x1810),
    ("limbu", 0x1946),
    ("new-tai-lue", 0x19D0),
    ("balinese", 0x1B50),
    ("sundanese", 0x1BB0),
    ("lepcha", 0x1C40),
    ("ol-chiki", 0x1C50),
    ("kayah-li", 0xA900),
    ("javanese", 0xA9D0),
    ("osmanya", 0x104A0),
];

const SIMP_INFORMAL: ChineseSymbols = ChineseSymbols::new(
    ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'],
    ['十', '百', '千'],
);
const SIMP_FORMAL: ChineseSymbols = ChineseSymbols::new(
    ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'],
    ['拾', '佰', '仟'],
);
const TRAD_FORMAL: ChineseSymbols = ChineseSymbols::new(
    ['零', '壹', '貳', '參', '肆', '伍', '陸', '柒', '捌', '玖'],
    ['拾', '佰', '仟'],
);

/// The predefined counter styles, keyed by name.
///
/// Built once on first lookup and shared afterwards. Every style except
/// `decimal` falls back to `decimal` unless noted otherwise.
#[derive(Default)]
pub struct CounterRegistry {
    styles: OnceLock<HashMap<String, Arc<CounterStyle>>>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn shared() -> Arc<CounterRegistry> {
        static SHARED: OnceLock<Arc<CounterRegistry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(CounterRegistry::new())).clone()
    }

    /// Looks up a style by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<CounterStyle>> {
        let name = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| target);
        self.styles().get(name).cloned()
    }

    /// All canonical style names, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles().keys().map(String::as_str)
    }

    fn styles(&self) -> &HashMap<String, Arc<CounterStyle>> {
        self.styles.get_or_init(build_styles)
    }
}

fn code_points(first: u32, count: u32) -> Vec<String> {
    (first..first + count)
        .filter_map(char::from_u32)
        .map(String::from)
        .collect()
}

fn additive(table: &[(u64, &str)]) -> System {
    System::Additive(
        table
            .iter()
            .map(|(weight, symbol)| (*weight, symbol.to_string()))
            .collect(),
    )
}

fn fixed(symbols: Vec<String>) -> System {
    System::Fixed { first: 1, symbols }
}

fn build_styles() -> HashMap<String, Arc<CounterStyle>> {
    let decimal = Arc::new(
        CounterStyle::builder("decimal", System::Numeric(symbols("0123456789"))).build(),
    );
    let with_fallback =
        |name: &str, system: System| CounterStyle::builder(name, system).fallback(decimal.clone());
    let cjk_decimal = Arc::new(
        with_fallback("cjk-decimal", System::Numeric(symbols("〇一二三四五六七八九")))
            .suffix("、")
            .build(),
    );

    let mut styles: HashMap<String, Arc<CounterStyle>> = HashMap::new();
    styles.insert("decimal".to_string(), decimal.clone());
    styles.insert("cjk-decimal".to_string(), cjk_decimal.clone());

    let mut add = |style: CounterStyle| {
        styles.insert(style.css_id().to_string(), Arc::new(style));
    };

    // Numeric
    add(with_fallback("decimal-leading-zero", System::Numeric(symbols("0123456789")))
        .pad(2, "0")
        .build());
    add(with_fallback("binary", System::Numeric(symbols("01"))).build());
    add(with_fallback("octal", System::Numeric(symbols("01234567"))).build());
    add(with_fallback("lower-hexadecimal", System::Numeric(symbols("0123456789abcdef"))).build());
    add(with_fallback("upper-hexadecimal", System::Numeric(symbols("0123456789ABCDEF"))).build());
    for (name, base) in DECIMAL_BASES {
        add(with_fallback(name, System::Numeric(code_points(base, 10))).build());
    }
    add(with_fallback("fullwidth-decimal", System::Numeric(code_points(0xFF10, 10))).build());
    add(with_fallback("super-decimal", System::Numeric(symbols("⁰¹²³⁴⁵⁶⁷⁸⁹"))).build());

    // Alphabetic
    for (name, first) in [
        ("lower-alpha", 0x61),
        ("lower-latin", 0x61),
        ("upper-alpha", 0x41),
        ("upper-latin", 0x41),
        ("fullwidth-lower-alpha", 0xFF41),
        ("fullwidth-upper-alpha", 0xFF21),
    ] {
        add(with_fallback(name, System::Alphabetic(code_points(first, 26))).build());
    }
    add(with_fallback(
        "lower-greek",
        System::Alphabetic(symbols("αβγδεζηθικλμνξοπρστυφχψω")),
    )
    .build());
    add(with_fallback(
        "upper-greek",
        System::Alphabetic(symbols("ΑΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩ")),
    )
    .build());
    add(with_fallback(
        "lower-russian",
        System::Alphabetic(symbols("абвгдежзиклмнопрстуфхцчшщэюя")),
    )
    .build());
    add(with_fallback(
        "upper-russian",
        System::Alphabetic(symbols("АБВГДЕЖЗИКЛМНОПРСТУФХЦЧШЩЭЮЯ")),
    )
    .build());
    add(with_fallback(
        "lower-ukrainian",
        System::Alphabetic(symbols("абвгдежзийклмнопрстуфхцчшщюя")),
    )
    .build());
    add(with_fallback(
        "upper-ukrainian",
        System::Alphabetic(symbols("АБВГДЕЖЗИЙКЛМНОПРСТУФХЦЧШЩЮЯ")),
    )
    .build());
    add(with_fallback(
        "hiragana",
        System::Alphabetic(symbols(
            "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわゐゑをん",
        )),
    )
    .suffix("、")
    .build());
    add(with_fallback(
        "hiragana-iroha",
        System::Alphabetic(symbols(
            "いろはにほへとちりぬるをわかよたれそつねならむうゐのおくやまけふこえてあさきゆめみしゑひもせす",
        )),
    )
    .suffix("、")
    .build());
    add(with_fallback(
        "katakana",
        System::Alphabetic(symbols(
            "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヰヱヲン",
        )),
    )
    .suffix("、")
    .build());
    add(with_fallback(
        "katakana-iroha",
        System::Alphabetic(symbols(
            "イロハニホヘトチリヌルヲワカヨタレソツネナラムウヰノオクヤマケフコエテアサキユメミシヱヒモセス",
        )),
    )
    .suffix("、")
    .build());
    for (name, glyphs) in [
        ("cjk-earthly-branch", "子丑寅卯辰巳午未申酉戌亥"),
        ("cjk-heavenly-stem", "甲乙丙丁戊己庚辛壬癸"),
    ] {
        add(with_fallback(name, System::Alphabetic(symbols(glyphs)))
            .suffix("、")
            .build());
    }

    // Additive
    add(with_fallback(
        "lower-roman",
        additive(&[
            (1000, "m"),
            (900, "cm"),
            (500, "d"),
            (400, "cd"),
            (100, "c"),
            (90, "xc"),
            (50, "l"),
            (40, "xl"),
            (10, "x"),
            (9, "ix"),
            (5, "v"),
            (4, "iv"),
            (1, "i"),
        ]),
    )
    .range(Some(1), Some(3999))
    .build());
    add(with_fallback(
        "upper-roman",
        additive(&[
            (1000, "M"),
            (900, "CM"),
            (500, "D"),
            (400, "CD"),
            (100, "C"),
            (90, "XC"),
            (50, "L"),
            (40, "XL"),
            (10, "X"),
            (9, "IX"),
            (5, "V"),
            (4, "IV"),
            (1, "I"),
        ]),
    )
    .range(Some(1), Some(3999))
    .build());
    add(with_fallback(
        "hebrew",
        additive(&[
            (10000, "י׳"),
            (9000, "ט׳"),
            (8000, "ח׳"),
            (7000, "ז׳"),
            (6000, "ו׳"),
            (5000, "ה׳"),
            (4000, "ד׳"),
            (3000, "ג׳"),
            (2000, "ב׳"),
            (1000, "א׳"),
            (400, "ת"),
            (300, "ש"),
            (200, "ר"),
            (100, "ק"),
            (90, "צ"),
            (80, "פ"),
            (70, "ע"),
            (60, "ס"),
            (50, "נ"),
            (40, "מ"),
            (30, "ל"),
            (20, "כ"),
            (19, "יט"),
            (18, "יח"),
            (17, "יז"),
            (16, "טז"),
            (15, "טו"),
            (10, "י"),
            (9, "ט"),
            (8, "ח"),
            (7, "ז"),
            (6, "ו"),
            (5, "ה"),
            (4, "ד"),
            (3, "ג"),
            (2, "ב"),
            (1, "א"),
        ]),
    )
    .range(Some(1), Some(10999))
    .build());
    let armenian = |name: &str| {
        with_fallback(
            name,
            additive(&[
                (9000, "Ք"),
                (8000, "Փ"),
                (7000, "Ւ"),
                (6000, "Ց"),
                (5000, "Ր"),
                (4000, "Տ"),
                (3000, "Վ"),
                (2000, "Ս"),
                (1000, "Ռ"),
                (900, "Ջ"),
                (800, "Պ"),
                (700, "Չ"),
                (600, "Ո"),
                (500, "Շ"),
                (400, "Ն"),
                (300, "Յ"),
                (200, "Մ"),
                (100, "Ճ"),
                (90, "Ղ"),
                (80, "Ձ"),
                (70, "Հ"),
                (60, "Կ"),
                (50, "Ծ"),
                (40, "Խ"),
                (30, "Լ"),
                (20, "Ի"),
                (10, "Ժ"),
                (9, "Թ"),
                (8, "Ը"),
                (7, "Է"),
                (6, "Զ"),
                (5, "Ե"),
                (4, "Դ"),
                (3, "Գ"),
                (2, "Բ"),
                (1, "Ա"),
            ]),
        )
        .range(Some(1), Some(9999))
        .build()
    };
    add(armenian("armenian"));
    add(armenian("upper-armenian"));
    add(with_fallback(
        "lower-armenian",
        additive(&[
            (9000, "ք"),
            (8000, "փ"),
            (7000, "ւ"),
            (6000, "ց"),
            (5000, "ր"),
            (4000, "տ"),
            (3000, "վ"),
            (2000, "ս"),
            (1000, "ռ"),
            (900, "ջ"),
            (800, "պ"),
            (700, "չ"),
            (600, "ո"),
            (500, "շ"),
            (400, "ն"),
            (300, "յ"),
            (200, "մ"),
            (100, "ճ"),
            (90, "ղ"),
            (80, "ձ"),
            (70, "հ"),
            (60, "կ"),
            (50, "ծ"),
            (40, "խ"),
            (30, "լ"),
            (20, "ի"),
            (10, "ժ"),
            (9, "թ"),
            (8, "ը"),
            (7, "է"),
            (6, "զ"),
            (5, "ե"),
            (4, "դ"),
            (3, "գ"),
            (2, "բ"),
            (1, "ա"),
        ]),
    )
    .range(Some(1), Some(9999))
    .build());
    add(with_fallback(
        "georgian",
        additive(&[
            (10000, "ჵ"),
            (9000, "ჰ"),
            (8000, "ჯ"),
            (7000, "ჴ"),
            (6000, "ხ"),
            (5000, "ჭ"),
            (4000, "წ"),
            (3000, "ძ"),
            (2000, "ც"),
            (1000, "ჩ"),
            (900, "შ"),
            (800, "ყ"),
            (700, "ღ"),
            (600, "ქ"),
            (500, "ფ"),
            (400, "ჳ"),
            (300, "ტ"),
            (200, "ს"),
            (100, "რ"),
            (90, "ჟ"),
            (80, "პ"),
            (70, "ო"),
            (60, "ჲ"),
            (50, "ნ"),
            (40, "მ"),
            (30, "ლ"),
            (20, "კ"),
            (10, "ი"),
            (9, "თ"),
            (8, "ჱ"),
            (7, "ზ"),
            (6, "ვ"),
            (5, "ე"),
            (4, "დ"),
            (3, "გ"),
            (2, "ბ"),
            (1, "ა"),
        ]),
    )
    .range(Some(1), Some(19999))
    .build());
    add(with_fallback(
        "japanese-informal",
        additive(&[
            (9000, "九千"),
            (8000, "八千"),
            (7000, "七千"),
            (6000, "六千"),
            (5000, "五千"),
            (4000, "四千"),
            (3000, "三千"),
            (2000, "二千"),
            (1000, "千"),
            (900, "九百"),
            (800, "八百"),
            (700, "七百"),
            (600, "六百"),
            (500, "五百"),
            (400, "四百"),
            (300, "三百"),
            (200, "二百"),
            (100, "百"),
            (90, "九十"),
            (80, "八十"),
            (70, "七十"),
            (60, "六十"),
            (50, "五十"),
            (40, "四十"),
            (30, "三十"),
            (20, "二十"),
            (10, "十"),
            (9, "九"),
            (8, "八"),
            (7, "七"),
            (6, "六"),
            (5, "五"),
            (4, "四"),
            (3, "三"),
            (2, "二"),
            (1, "一"),
            (0, "〇"),
        ]),
    )
    .range(Some(-9999), Some(9999))
    .negative("マイナス", "")
    .suffix("、")
    .fallback(cjk_decimal.clone())
    .build());
    add(with_fallback(
        "japanese-formal",
        additive(&[
            (9000, "九阡"),
            (8000, "八阡"),
            (7000, "七阡"),
            (6000, "六阡"),
            (5000, "伍阡"),
            (4000, "四阡"),
            (3000, "参阡"),
            (2000, "弐阡"),
            (1000, "壱阡"),
            (900, "九百"),
            (800, "八百"),
            (700, "七百"),
            (600, "六百"),
            (500, "伍百"),
            (400, "四百"),
            (300, "参百"),
            (200, "弐百"),
            (100, "壱百"),
            (90, "九拾"),
            (80, "八拾"),
            (70, "七拾"),
            (60, "六拾"),
            (50, "伍拾"),
            (40, "四拾"),
            (30, "参拾"),
            (20, "弐拾"),
            (10, "壱拾"),
            (9, "九"),
            (8, "八"),
            (7, "七"),
            (6, "六"),
            (5, "伍"),
            (4, "四"),
            (3, "参"),
            (2, "弐"),
            (1, "壱"),
            (0, "零"),
        ]),
    )
    .range(Some(-9999), Some(9999))
    .negative("マイナス", "")
    .suffix("、")
    .fallback(cjk_decimal.clone())
    .build());
    add(with_fallback(
        "korean-hangul-formal",
        additive(&[
            (9000, "구천"),
            (8000, "팔천"),
            (7000, "칠천"),
            (6000, "육천"),
            (5000, "오천"),
            (4000, "사천"),
            (3000, "삼천"),
            (2000, "이천"),
            (1000, "일천"),
            (900, "구백"),
            (800, "팔백"),
            (700, "칠백"),
            (600, "육백"),
            (500, "오백"),
            (400, "사백"),
            (300, "삼백"),
            (200, "이백"),
            (100, "일백"),
            (90, "구십"),
            (80, "팔십"),
            (70, "칠십"),
            (60, "육십"),
            (50, "오십"),
            (40, "사십"),
            (30, "삼십"),
            (20, "이십"),
            (10, "일십"),
            (9, "구"),
            (8, "팔"),
            (7, "칠"),
            (6, "육"),
            (5, "오"),
            (4, "사"),
            (3, "삼"),
            (2, "이"),
            (1, "일"),
            (0, "영"),
        ]),
    )
    .range(Some(-9999), Some(9999))
    .negative("마이너스 ", "")
    .suffix(", ")
    .build());

    // Symbolic
    add(with_fallback("lower-alpha-symbolic", System::Symbolic(code_points(0x61, 26))).build());
    add(with_fallback("upper-alpha-symbolic", System::Symbolic(code_points(0x41, 26))).build());
    add(with_fallback("footnote", System::Symbolic(symbols("*⁑†‡"))).build());

    // Cyclic
    for (name, symbol) in [
        ("disc", "•"),
        ("circle", "◦"),
        ("square", "▪"),
        ("disclosure-open", "▾"),
        ("disclosure-closed", "▸"),
    ] {
        add(with_fallback(name, System::Cyclic(vec![symbol.to_string()])).build());
    }

    // Fixed
    let mut circled = code_points(0x24EA, 1);
    circled.extend(code_points(0x2460, 20));
    circled.extend(code_points(0x3251, 15));
    circled.extend(code_points(0x32B1, 15));
    add(with_fallback(
        "circled-decimal",
        System::Fixed {
            first: 0,
            symbols: circled,
        },
    )
    .build());
    add(with_fallback("circled-lower-latin", fixed(code_points(0x24D0, 26))).build());
    add(with_fallback("circled-upper-latin", fixed(code_points(0x24B6, 26))).build());
    let mut filled = code_points(0x2776, 10);
    filled.extend(code_points(0x24EB, 10));
    add(with_fallback("filled-circled-decimal", fixed(filled)).build());
    add(with_fallback("double-circled-decimal", fixed(code_points(0x24F5, 10))).build());
    add(with_fallback("parenthesized-decimal", fixed(code_points(0x2474, 20))).build());
    add(with_fallback("parenthesized-lower-latin", fixed(code_points(0x249C, 26))).build());
    add(with_fallback("dotted-decimal", fixed(code_points(0x2488, 20))).build());
    add(with_fallback(
        "cjk-stem-branch",
        System::Fixed {
            first: 1,
            symbols: stem_branch(),
        },
    )
    .build());

    // Chinese
    for (name, chars, negative) in [
        ("simp-chinese-informal", SIMP_INFORMAL, "负"),
        ("simp-chinese-formal", SIMP_FORMAL, "负"),
        ("trad-chinese-informal", SIMP_INFORMAL, "負"),
        ("trad-chinese-formal", TRAD_FORMAL, "負"),
    ] {
        add(CounterStyle::builder(name, System::Chinese(chars))
            .negative(negative, "")
            .suffix("、")
            .fallback(cjk_decimal.clone())
            .build());
    }

    add(with_fallback("ethiopic-numeric", System::Ethiopic).build());

    styles
}

/// The sexagenary cycle: stems and branches advancing together.
fn stem_branch() -> Vec<String> {
    let stems: Vec<char> = "甲乙丙丁戊己庚辛壬癸".chars().collect();
    let branches: Vec<char> = "子丑寅卯辰巳午未申酉戌亥".chars().collect();
    (0..60)
        .map(|i| format!("{}{}", stems[i % stems.len()], branches[i % branches.len()]))
        .collect()
}
