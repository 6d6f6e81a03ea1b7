//! Name pools and location fragments for synthesis.
//!
//! Kanji/kana pairs only; romanized names are not stored. The 仮 / カリ
//! markers are applied where the values are used, not here.

/// Family names: (kanji, katakana).
pub const FAMILY_NAMES: &[(&str, &str)] = &[
    ("山田", "ヤマダ"),
    ("佐藤", "サトウ"),
    ("鈴木", "スズキ"),
    ("高橋", "タカハシ"),
    ("田中", "タナカ"),
    ("伊藤", "イトウ"),
    ("渡辺", "ワタナベ"),
    ("中村", "ナカムラ"),
    ("小林", "コバヤシ"),
    ("加藤", "カトウ"),
    ("吉田", "ヨシダ"),
    ("山本", "ヤマモト"),
    ("佐々木", "ササキ"),
    ("松本", "マツモト"),
    ("井上", "イノウエ"),
    ("木村", "キムラ"),
];

/// Male given names: (kanji, katakana).
pub const GIVEN_NAMES_MALE: &[(&str, &str)] = &[
    ("太郎", "タロウ"),
    ("一郎", "イチロウ"),
    ("健太", "ケンタ"),
    ("翔太", "ショウタ"),
    ("大輔", "ダイスケ"),
    ("直樹", "ナオキ"),
    ("誠", "マコト"),
    ("浩", "ヒロシ"),
    ("学", "マナブ"),
    ("隆", "タカシ"),
    ("修", "オサム"),
    ("徹", "トオル"),
];

/// Female given names: (kanji, katakana).
pub const GIVEN_NAMES_FEMALE: &[(&str, &str)] = &[
    ("花子", "ハナコ"),
    ("美咲", "ミサキ"),
    ("陽子", "ヨウコ"),
    ("恵子", "ケイコ"),
    ("由美", "ユミ"),
    ("直子", "ナオコ"),
    ("真由美", "マユミ"),
    ("久美子", "クミコ"),
    ("幸子", "サチコ"),
    ("綾乃", "アヤノ"),
    ("葵", "アオイ"),
    ("結衣", "ユイ"),
];

/// Employers for working patients.
pub const COMPANIES: &[&str] = &[
    "鹿ノ門商事株式会社",
    "株式会社登呂製作所",
    "芝公園運輸株式会社",
    "株式会社丸の内企画",
    "大崎電機工業株式会社",
    "豊洲水産株式会社",
];

/// Building names; prefixed with 仮 when placed into an address.
pub const BUILDING_NAMES: &[&str] = &[
    "コーポ桜",
    "メゾン富士",
    "ハイツあおば",
    "レジデンス松",
    "サンハイム青空",
    "パークサイド柳",
];

/// Ward / room / bed pools for admissions.
pub const WARDS: &[&str] = &["31", "32", "41", "51", "61"];
pub const ROOMS: &[&str] = &["301", "302", "305", "401", "402", "505"];
pub const BEDS: &[&str] = &["1", "2", "3", "4"];

/// Allergy pool: (type code, allergen code, allergen name, code system).
pub const ALLERGIES: &[(&str, &str, &str, &str)] = &[
    ("DA", "1", "ペニシリン", "99XYZ"),
    ("DA", "2", "アスピリン", "99XYZ"),
    ("DA", "3", "スルファ剤", "99XYZ"),
    ("DA", "4", "セフェム系抗生物質", "99XYZ"),
    ("DA", "13", "非ステロイド性抗炎症薬", "99XYZ"),
    ("FA", "J9FA21180000", "ピーナッツ", "J-FAGY"),
    ("FA", "J9FC12000000", "貝類", "J-FAGY"),
    ("LA", "J9NK12000000", "花粉", "J-FAGY"),
    ("AA", "J9NJ12150000", "猫", "J-FAGY"),
    ("AA", "J9NJ12110000", "犬", "J-FAGY"),
    ("PA", "J9NK12150000", "ブタクサ", "J-FAGY"),
    ("EA", "J9NM12000000", "ダニ", "J-FAGY"),
    ("MC", "J9NT11000000", "アルコール", "J-FAGY"),
];

/// Prefectures adjacent to the synthetic hospital, drawn at 25%.
pub const NEIGHBOR_PREFECTURES: &[&str] = &[
    "埼玉県",
    "神奈川県",
    "千葉県",
    "茨城県",
    "栃木県",
    "群馬県",
    "山梨県",
];
