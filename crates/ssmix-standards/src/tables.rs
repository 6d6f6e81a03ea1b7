//! HL7 code tables used by the supported SS-MIX2 profiles.
//!
//! Tables are `(code, display)` slices with `lookup`/`contains` helpers.
//! User tables (UDT) follow the JAHIS localization of HL7 v2.5; the
//! HL70xxx tables are the standard ones the profiles narrow.

/// Looks a code up in a `(code, display)` table.
pub fn lookup<'t>(table: &'t [(&str, &str)], code: &str) -> Option<&'t str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// True when the code is a member of the table.
pub fn contains(table: &[(&str, &str)], code: &str) -> bool {
    table.iter().any(|(c, _)| *c == code)
}

/// User table 0001 — administrative sex.
pub const UDT_0001_SEX: &[(&str, &str)] = &[
    ("F", "女性"),
    ("M", "男性"),
    ("O", "その他"),
    ("U", "不明"),
    ("A", "両性"),
    ("N", "適用外"),
];

/// User table 0003 — trigger events carried by the supported store.
pub const UDT_0003_EVENT: &[(&str, &str)] = &[
    ("A01", "入院実施"),
    ("A02", "患者転送"),
    ("A03", "退院実施"),
    ("A04", "外来受診"),
    ("A08", "患者情報更新"),
    ("A14", "入院予定"),
    ("A15", "転送保留"),
    ("A16", "退院予定"),
    ("A21", "外出泊実施"),
    ("A22", "外出泊帰院実施"),
    ("A54", "担当医変更"),
    ("A60", "アレルギー情報"),
    ("O03", "食事オーダ"),
    ("O11", "薬剤オーダ"),
    ("O17", "与薬実施"),
    ("O19", "検査オーダ"),
    ("O33", "検体検査オーダ"),
    ("R01", "検査結果"),
    ("R22", "検体検査結果"),
    ("Z23", "放射線検査結果"),
    ("ZD1", "病名オーダ"),
];

/// HL7 table 0354 — message structures.
pub const H7T_0354_STRUCTURE: &[(&str, &str)] = &[
    ("ADT_A01", "A01, A04, A08, A14"),
    ("ADT_A02", "A02"),
    ("ADT_A03", "A03"),
    ("ADT_A05", "A05, A14, A38"),
    ("ADT_A09", "A09, A10, A11"),
    ("ADT_A16", "A16"),
    ("ADT_A21", "A21, A22, A52, A53"),
    ("ADT_A54", "A54, A55"),
    ("ADT_A60", "A60"),
    ("OMD_O03", "O03"),
    ("OML_O33", "O33"),
    ("OMP_O09", "O09"),
    ("ORU_R01", "R01"),
    ("OUL_R22", "R22"),
    ("PPR_ZD1", "ZD1"),
    ("RAS_O17", "O17"),
    ("RDE_O11", "O11"),
];

/// User table 0076 — message codes.
pub const UDT_0076_MESSAGE: &[(&str, &str)] = &[
    ("ADT", "ADT メッセージ"),
    ("OMD", "食事オーダ"),
    ("OMG", "一般臨床オーダ"),
    ("OMI", "画像オーダ"),
    ("OML", "検体検査オーダ"),
    ("OMP", "薬剤オーダ"),
    ("ORU", "観察結果"),
    ("OUL", "検査結果"),
    ("PPR", "患者問題"),
    ("RAS", "与薬実施"),
    ("RDE", "薬剤オーダ詳細"),
];

/// User table 0069 — hospital departments (JAHIS 診療科コード).
pub const UDT_0069_DEPARTMENT: &[(&str, &str)] = &[
    ("01", "内科"),
    ("011", "第１内科"),
    ("012", "第２内科"),
    ("018", "一般内科"),
    ("02", "精神科"),
    ("03", "神経科"),
    ("04", "神経内科"),
    ("05", "呼吸器科"),
    ("06", "消化器科"),
    ("061", "肝臓内科"),
    ("08", "循環器科"),
    ("081", "循環器内科"),
    ("09", "小児科"),
    ("09A", "総合診療科"),
    ("10", "外科"),
    ("101", "第１外科"),
    ("102", "第２外科"),
    ("11", "整形外科"),
    ("12", "形成外科"),
    ("13", "美容外科"),
    ("14", "脳神経外科"),
    ("15", "呼吸器外科"),
    ("16", "心臓血管外科"),
    ("18", "小児外科"),
    ("21", "皮膚科"),
    ("22", "泌尿器科"),
    ("24", "産婦人科"),
    ("25", "産科"),
    ("26", "婦人科"),
    ("27", "眼科"),
    ("28", "耳鼻咽喉科"),
    ("30", "放射線科"),
    ("31", "麻酔科"),
    ("33", "リハビリテーション科"),
    ("99", "その他"),
];

/// User table 0112 — discharge disposition.
pub const UDT_0112_DISPOSITION: &[(&str, &str)] = &[
    ("01", "治癒"),
    ("02", "軽快"),
    ("03", "寛解"),
    ("04", "不変"),
    ("05", "増悪"),
    ("06", "死亡"),
    ("07", "外死亡"),
    ("09", "その他"),
];

/// User table 0127 — allergy types.
pub const UDT_0127_ALLERGY: &[(&str, &str)] = &[
    ("AA", "動物アレルギー"),
    ("DA", "薬剤アレルギー"),
    ("EA", "環境アレルギー"),
    ("FA", "食物アレルギー"),
    ("LA", "花粉アレルギー"),
    ("MA", "その他アレルギー"),
    ("MC", "その他禁忌"),
    ("PA", "植物アレルギー"),
];

/// User table 0063 — next-of-kin / insured relationship.
pub const UDT_0063_RELATIONSHIP: &[(&str, &str)] = &[
    ("SEL", "本人"),
    ("SPO", "配偶者"),
    ("CHD", "子"),
    ("PAR", "親"),
    ("SIB", "兄弟姉妹"),
    ("GRD", "後見人"),
    ("EXF", "大家族"),
    ("OTH", "その他"),
];

/// User table 0062 — event reason.
pub const UDT_0062_EVENT_REASON: &[(&str, &str)] = &[
    ("01", "患者要求"),
    ("02", "医師指示"),
    ("03", "心配・苦情"),
    ("O", "その他"),
];

/// User table 0162 — route of administration.
pub const UDT_0162_ROUTE: &[(&str, &str)] = &[
    ("PO", "口"),
    ("IV", "静脈内"),
    ("IM", "筋肉内"),
    ("SC", "皮下"),
    ("PR", "直腸"),
    ("SL", "舌下"),
    ("TP", "局所"),
    ("OP", "眼科用"),
    ("OT", "耳用"),
    ("NS", "鼻腔"),
    ("IH", "吸入"),
    ("TD", "経皮"),
    ("OTH", "その他/雑"),
];

/// User table 0164 — administration device.
pub const UDT_0164_DEVICE: &[(&str, &str)] = &[
    ("IVP", "点滴ポンプ"),
    ("IVS", "点滴セット"),
    ("PCA", "PCAポンプ"),
    ("SYR", "シリンジポンプ"),
];

/// User table 0334 — disabled person code.
pub const UDT_0334_DISABLED: &[(&str, &str)] = &[
    ("PT", "患者"),
    ("GT", "保証人"),
    ("NK", "近親者"),
    ("AS", "被保険者"),
];

/// HL7 table 0119 — order control codes.
pub const H7T_0119_ORDER_CONTROL: &[(&str, &str)] = &[
    ("NW", "新規オーダ"),
    ("CA", "オーダ取消依頼"),
    ("OK", "依頼受領"),
    ("SC", "状態変化"),
    ("RP", "オーダ置換依頼"),
];

/// HL7 table 0038 — order status.
pub const H7T_0038_ORDER_STATUS: &[(&str, &str)] = &[
    ("A", "一部結果あり"),
    ("CA", "オーダ取消"),
    ("CM", "オーダ完了"),
    ("DC", "オーダ中止"),
    ("ER", "エラー"),
    ("HD", "オーダ保留"),
    ("IP", "実施中"),
    ("RP", "オーダ置換"),
    ("SC", "処理予定"),
];

/// HL7 table 0085 — observation result status.
pub const H7T_0085_RESULT_STATUS: &[(&str, &str)] = &[
    ("C", "訂正結果"),
    ("D", "削除"),
    ("F", "最終結果"),
    ("I", "保留"),
    ("P", "暫定結果"),
    ("R", "未検証"),
    ("S", "部分結果"),
    ("U", "最終へ変更"),
    ("W", "誤報告"),
    ("X", "実施不能"),
];

/// HL7 table 0125 — observation value types.
pub const H7T_0125_VALUE_TYPE: &[(&str, &str)] = &[
    ("CE", "コード化要素"),
    ("CWE", "コード化(例外あり)"),
    ("DT", "日付"),
    ("ED", "カプセル化データ"),
    ("FT", "書式付きテキスト"),
    ("NM", "数値"),
    ("SN", "構造化数値"),
    ("ST", "文字列"),
    ("TM", "時刻"),
    ("TS", "タイムスタンプ"),
    ("TX", "テキストデータ"),
];

/// HL7 table 0482 — order type.
pub const H7T_0482_ORDER_TYPE: &[(&str, &str)] = &[
    ("I", "入院患者オーダ"),
    ("O", "外来患者オーダ"),
];

/// HL7 table 0166 — RX component type.
pub const H7T_0166_COMPONENT: &[(&str, &str)] = &[("A", "混注成分"), ("B", "基剤")];

/// HL7 table 0078 — abnormal flags.
pub const H7T_0078_ABNORMAL: &[(&str, &str)] = &[
    ("L", "基準値下限以下"),
    ("H", "基準値上限以上"),
    ("LL", "パニック値下限以下"),
    ("HH", "パニック値上限以上"),
    ("N", "正常"),
    ("A", "異常"),
];

/// JAHIS table JHSD0002 — public expense insurance types (法別番号).
pub const JHSD_0002_PUBLIC_EXPENSE: &[(&str, &str)] = &[
    ("10", "結核患者の適正医療"),
    ("11", "結核患者の入院"),
    ("12", "生活保護"),
    ("13", "戦傷病者特別援護法"),
    ("15", "自立支援医療(更生医療)"),
    ("16", "自立支援医療(育成医療)"),
    ("21", "自立支援医療(精神通院)"),
    ("51", "特定疾患治療"),
    ("52", "小児慢性特定疾病"),
    ("54", "難病医療"),
    ("80", "地方公共団体独自の医療費助成"),
];

/// JAHIS table JHSD0004 — diagnosis type.
pub const JHSD_0004_DIAGNOSIS_TYPE: &[(&str, &str)] = &[
    ("O", "外来時"),
    ("A", "入院時"),
    ("D", "退院時"),
    ("F", "最終"),
];

/// JAHIS table JHSI0002 — injection order types.
pub const JHSI_0002_INJECTION: &[(&str, &str)] = &[
    ("01", "一般"),
    ("02", "中心静脈"),
    ("03", "抗がん剤"),
    ("04", "輸血"),
];

/// MERIT-9 処方オーダ表3 — dosage form codes.
pub const MERIT_9_3_DOSAGE_FORM: &[(&str, &str)] = &[
    ("TAB", "錠剤"),
    ("CAP", "カプセル剤"),
    ("PWD", "散剤"),
    ("GRN", "顆粒剤"),
    ("SYR", "シロップ剤"),
    ("LQD", "液剤"),
    ("SUP", "坐剤"),
    ("OIT", "軟膏剤"),
    ("CRM", "クリーム剤"),
    ("PAT", "貼付剤"),
    ("INH", "吸入剤"),
    ("INJ", "注射剤"),
    ("OPH", "点眼剤"),
];

/// MERIT-9 処方オーダ表4 — dose unit abbreviations.
pub const MERIT_9_4_UNIT: &[(&str, &str)] = &[
    ("TAB", "錠"),
    ("CAP", "カプセル"),
    ("PCK", "包"),
    ("PAC", "分包"),
    ("DOSE", "回分"),
    ("KO", "個"),
    ("HON", "本"),
    ("MAI", "枚"),
    ("AMP", "アンプル"),
    ("VIA", "バイアル"),
    ("KIT", "キット"),
    ("ML", "ミリリットル"),
    ("MG", "ミリグラム"),
    ("G", "グラム"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_members() {
        assert_eq!(lookup(UDT_0069_DEPARTMENT, "01"), Some("内科"));
        assert_eq!(lookup(UDT_0162_ROUTE, "PO"), Some("口"));
        assert!(lookup(UDT_0162_ROUTE, "ZZ").is_none());
    }

    #[test]
    fn sex_table_covers_filename_grammar() {
        for code in ["M", "F", "O", "U", "N"] {
            assert!(contains(UDT_0001_SEX, code));
        }
    }

    #[test]
    fn order_type_table_is_inpatient_outpatient_only() {
        assert_eq!(H7T_0482_ORDER_TYPE.len(), 2);
        assert!(contains(H7T_0482_ORDER_TYPE, "I"));
        assert!(contains(H7T_0482_ORDER_TYPE, "O"));
    }
}
