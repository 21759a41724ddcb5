// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end rewrite of a small mock-data dump: the board table grows
//! author/nickname/status/counter columns, with the author and nickname
//! derived from the user id through lookup tables.

use std::io::BufReader;

use sqltuple_rewriter::{
    mysql_to_postgres, Field, HeaderRewrite, LookupTable, RemapRule, Remapper, Rewriter,
};

fn board_remapper() -> Remapper {
    let mut authors = LookupTable::new("사용자");
    let mut nicknames = LookupTable::new("닉네임");
    for (id, author, nickname) in &[
        ("2", "김철수", "코딩마스터"),
        ("3", "이영희", "개발왕초보"),
        ("4", "박민수", "JavaLover"),
    ] {
        authors.insert(id, author);
        nicknames.insert(id, nickname);
    }

    // (user_id, title, content, view_count, like_count, is_draft,
    //  created_at, updated_at)
    // becomes
    // (user_id, author, nickname, title, content, status, view_count,
    //  like_count, comment_count, is_draft, is_pinned, is_important,
    //  created_at, updated_at)
    Remapper::new(vec![
        RemapRule::Copy(0),
        RemapRule::Lookup {
            source: 0,
            table: "authors".to_string(),
        },
        RemapRule::Lookup {
            source: 0,
            table: "nicknames".to_string(),
        },
        RemapRule::Copy(1),
        RemapRule::Copy(2),
        RemapRule::Constant(Field::quoted("PUBLIC")),
        RemapRule::Copy(3),
        RemapRule::Copy(4),
        RemapRule::Constant(Field::raw("0")),
        RemapRule::Copy(5),
        RemapRule::Constant(Field::raw("false")),
        RemapRule::Constant(Field::raw("false")),
        RemapRule::Copy(6),
        RemapRule::Copy(7),
    ])
    .with_table("authors", authors)
    .with_table("nicknames", nicknames)
}

#[test]
fn board_dump_is_reshaped() {
    let _ = simple_logger::init();

    let dump = "-- mock data\n\
                INSERT INTO board (user_id, title, content, view_count, like_count, is_draft, created_at, updated_at) VALUES\n\
                (2, 'first, post', 'hello', 10, 3, false, NOW() - INTERVAL '2 days', NOW()),\n\
                (4, 'second', 'world', 0, 0, true, NOW(), NOW());\n";

    let rewriter = Rewriter::new(board_remapper()).with_header(HeaderRewrite::new(
        "board",
        "board",
        &[
            "user_id",
            "author",
            "nickname",
            "title",
            "content",
            "status",
            "view_count",
            "like_count",
            "comment_count",
            "is_draft",
            "is_pinned",
            "is_important",
            "created_at",
            "updated_at",
        ],
    ));

    let mut output = Vec::new();
    let stats = rewriter
        .rewrite(BufReader::new(dump.as_bytes()), &mut output)
        .unwrap();

    assert_eq!(stats.lines, 4);
    assert_eq!(stats.headers_rewritten, 1);
    assert_eq!(stats.tuples_rewritten, 2);
    assert_eq!(stats.failures, 0);

    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with("-- mock data\n"));
    assert!(output.contains(
        "INSERT INTO board (user_id, author, nickname, title, content, status, \
         view_count, like_count, comment_count, is_draft, is_pinned, is_important, \
         created_at, updated_at) VALUES"
    ));
    assert!(output.contains(
        "(2, '김철수', '코딩마스터', 'first, post', 'hello', 'PUBLIC', 10, 3, 0, \
         false, false, false, NOW() - INTERVAL '2 days', NOW()),"
    ));
    assert!(output.contains(
        "(4, '박민수', 'JavaLover', 'second', 'world', 'PUBLIC', 0, 0, 0, \
         true, false, false, NOW(), NOW());"
    ));
}

#[test]
fn unmapped_user_gets_placeholder_and_batch_continues() {
    let _ = simple_logger::init();

    let dump = "(99, 't', 'c', 0, 0, false, NOW(), NOW()),\n\
                (2, 't', 'c', 0, 0, false, NOW(), NOW());\n";

    let rewriter = Rewriter::new(board_remapper());
    let mut output = Vec::new();
    let stats = rewriter
        .rewrite(BufReader::new(dump.as_bytes()), &mut output)
        .unwrap();

    assert_eq!(stats.tuples_rewritten, 2);
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("(99, '사용자99', '닉네임99', "));
}

#[test]
fn converted_dump_feeds_the_rewriter() {
    let mysql = "CREATE TABLE `board_like` (\n\
                 `id` bigint(20) NOT NULL AUTO_INCREMENT,\n\
                 `board_id` bigint(20) NOT NULL,\n\
                 `user_id` bigint(20) NOT NULL\n\
                 ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;\n\
                 \n\
                 INSERT INTO board_like (board_id, user_id) VALUES\n\
                 (1, 2),\n\
                 (1, 3);\n";

    let postgres = mysql_to_postgres(mysql);
    assert!(postgres.contains("\"id\" BIGSERIAL PRIMARY KEY"));
    assert!(postgres.contains("\"board_id\" bigint NOT NULL"));

    // board_like rows become (target_type, target_id, user_id) rows.
    let remapper = Remapper::new(vec![
        RemapRule::Constant(Field::quoted("POST")),
        RemapRule::Copy(0),
        RemapRule::Copy(1),
    ]);
    let rewriter = Rewriter::new(remapper).with_header(HeaderRewrite::new(
        "board_like",
        "likes",
        &["target_type", "target_id", "user_id"],
    ));

    let mut output = Vec::new();
    rewriter
        .rewrite(BufReader::new(postgres.as_bytes()), &mut output)
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("INSERT INTO likes (target_type, target_id, user_id) VALUES"));
    assert!(output.contains("('POST', 1, 2),"));
    assert!(output.contains("('POST', 1, 3);"));
}
